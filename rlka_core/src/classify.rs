//! Decorations of the provider's waste categories.

/// How the events of one waste category are decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Emoji put in front of the summary.
    pub prefix: &'static str,
    /// Text of the attached reminder.
    pub reminder_text: &'static str,
    /// Whether a reminder is attached at all.
    pub reminder: bool,
}

static UNDECORATED: Classification = Classification {
    prefix: "",
    reminder_text: "",
    reminder: false,
};

static CLASSIFICATIONS: [(&str, Classification); 5] = [
    (
        "Altpapier",
        Classification {
            prefix: "🟦",
            reminder_text: "Blaue Tonne rausstellen",
            reminder: true,
        },
    ),
    (
        "Gelbe Tonne",
        Classification {
            prefix: "🟨",
            reminder_text: "Gelbe Tonne rausstellen",
            reminder: true,
        },
    ),
    (
        "Restabfall",
        Classification {
            prefix: "⬛",
            reminder_text: "Graue Tonne rausstellen",
            reminder: true,
        },
    ),
    (
        "Bioabfall",
        Classification {
            prefix: "🟫",
            reminder_text: "Braune Tonne rausstellen",
            reminder: true,
        },
    ),
    (
        "Problemabfall",
        Classification {
            prefix: "🟥",
            reminder_text: "",
            reminder: false,
        },
    ),
];

/// Look up the decoration of a category label.
///
/// Labels are matched exactly; unknown labels stay undecorated.
pub fn classify(category: &str) -> Classification {
    CLASSIFICATIONS
        .iter()
        .find(|(label, _)| *label == category)
        .map(|(_, classification)| *classification)
        .unwrap_or(UNDECORATED)
}

impl Classification {
    /// The decorated summary of an event of `category`.
    pub fn summary(&self, category: &str) -> String {
        if self.prefix.is_empty() {
            return category.to_string();
        }
        format!("{} {category}", self.prefix)
    }

    /// The reminder text, if a reminder is attached.
    pub fn reminder_text(&self) -> Option<&'static str> {
        self.reminder.then_some(self.reminder_text)
    }
}
