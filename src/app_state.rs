/// Where key presses go when no modal is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Grid,
    Search,
}
