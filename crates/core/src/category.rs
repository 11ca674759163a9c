use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    Food,
    Transport,
    Shopping,
    Housing,
    Utilities,
    Health,
    Entertainment,
    Salary,
    Business,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Housing,
        Category::Utilities,
        Category::Health,
        Category::Entertainment,
        Category::Salary,
        Category::Business,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Salary => "Salary",
            Category::Business => "Business",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown category: '{wanted}'"))
    }
}
