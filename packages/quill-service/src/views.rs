use std::{fmt, str::FromStr};

use crate::Error;

/// Tab the session is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionView {
	#[default]
	Results,
	Saved,
	History,
	Analytics,
}
impl SessionView {
	pub const ALL: [Self; 4] = [Self::Results, Self::Saved, Self::History, Self::Analytics];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Results => "results",
			Self::Saved => "saved",
			Self::History => "history",
			Self::Analytics => "analytics",
		}
	}
}
impl fmt::Display for SessionView {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for SessionView {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|view| view.as_str() == raw.trim()).ok_or_else(|| {
			Error::InvalidRequest { message: format!("Unknown view {raw:?}.") }
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_known_views() {
		for view in SessionView::ALL {
			assert_eq!(view.as_str().parse::<SessionView>().expect("parse failed"), view);
		}

		assert!("timeline".parse::<SessionView>().is_err());
		assert_eq!(SessionView::default(), SessionView::Results);
	}
}
