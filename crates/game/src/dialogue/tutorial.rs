pub const TUTORIAL_MUSIC: &str = "route_30.ogg";
pub const TUTORIAL_STORY_PROGRESS: u32 = 1;

const PAGES: [(&str, &str); 8] = [
    (
        "Hello! Sorry to keep you waiting!",
        "Click on the flashing button to continue...",
    ),
    ("Welcome to the world of creatures online!", ""),
    ("My name is Oak!", "People call me the creature Prof."),
    (
        "In this world, some things are different",
        "than what you are used to.",
    ),
    (
        "For example, you are not alone in this world.",
        "There are other players around you.",
    ),
    ("You can see them and interact with them.", ""),
    ("Or battle them!", ""),
    ("But no more talking for now.", "Your journey awaits! Let's go!"),
];

#[derive(Debug, Clone, Default)]
pub struct Tutorial {
    page: usize,
}

impl Tutorial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count() -> usize {
        PAGES.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn text(&self) -> Option<(&'static str, &'static str)> {
        PAGES.get(self.page).copied()
    }

    /// Turns the page. Returns true once the last page is dismissed.
    pub fn dismiss(&mut self) -> bool {
        if self.page < PAGES.len() {
            self.page += 1;
        }
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.page >= PAGES.len()
    }
}
