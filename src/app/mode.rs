use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,
    Add,
    Edit,
    Search,
    ConfirmDelete,
    Import,
}

impl Mode {
    pub fn is_form(self) -> bool {
        matches!(self, Mode::Add | Mode::Edit)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigate => write!(f, "NAVIGATE"),
            Mode::Add => write!(f, "ADD"),
            Mode::Edit => write!(f, "EDIT"),
            Mode::Search => write!(f, "SEARCH"),
            Mode::ConfirmDelete => write!(f, "CONFIRM"),
            Mode::Import => write!(f, "IMPORT"),
        }
    }
}
