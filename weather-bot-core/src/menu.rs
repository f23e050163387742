//! Reply keyboards and the menu labels they carry.
//!
//! [`MenuButton`] is the only place captions are spelled out: the keyboards are
//! rendered from it and incoming text is matched back through it.

/// Main-menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuButton {
    EnterCity,
    MyLocation,
    PopularCities,
    Help,
    Back,
}

impl MenuButton {
    pub fn caption(&self) -> &'static str {
        match self {
            MenuButton::EnterCity => "🌍 Shahar kiriting",
            MenuButton::MyLocation => "📍 Mening joylashuvim",
            MenuButton::PopularCities => "⭐ Mashhur shaharlar",
            MenuButton::Help => "ℹ️ Yordam",
            MenuButton::Back => "🔙 Orqaga",
        }
    }

    pub const fn all() -> &'static [MenuButton] {
        &[
            MenuButton::EnterCity,
            MenuButton::MyLocation,
            MenuButton::PopularCities,
            MenuButton::Help,
            MenuButton::Back,
        ]
    }

    /// Exact caption match; nothing is trimmed or case-folded.
    pub fn from_caption(text: &str) -> Option<Self> {
        Self::all().iter().copied().find(|b| b.caption() == text)
    }

    fn button(self) -> KeyboardButton {
        KeyboardButton {
            caption: self.caption().to_string(),
            request_location: self == MenuButton::MyLocation,
        }
    }
}

pub const POPULAR_CITIES: &[&str] = &[
    "Toshkent", "Samarqand", "Andijon", "Namangan", "Farg'ona", "Buxoro", "Jizzax", "Qarshi",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub caption: String,
    /// Ask the client to share the user's location when pressed.
    pub request_location: bool,
}

/// A resizable reply keyboard, row by row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<KeyboardButton>>,
}

impl Keyboard {
    pub fn main_menu() -> Self {
        let rows = [
            MenuButton::EnterCity,
            MenuButton::MyLocation,
            MenuButton::PopularCities,
            MenuButton::Help,
        ]
        .into_iter()
        .map(|b| vec![b.button()])
        .collect();

        Self { rows }
    }

    pub fn popular_cities() -> Self {
        let mut rows: Vec<Vec<KeyboardButton>> = POPULAR_CITIES
            .chunks(2)
            .map(|pair| {
                pair.iter()
                    .map(|city| KeyboardButton { caption: city.to_string(), request_location: false })
                    .collect()
            })
            .collect();
        rows.push(vec![MenuButton::Back.button()]);

        Self { rows }
    }

    pub fn captions(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(|b| b.caption.as_str())
    }
}
