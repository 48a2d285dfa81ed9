//! Keyword classifier over article text.
//!
//! All three detectors are pure functions over `(title, content)` matching
//! lowercase substrings against `title + " " + content`. Rules live in ordered
//! const tables, evaluated top-to-bottom, so precedence is visible in the data
//! rather than buried in branching code.

use serde::{Deserialize, Serialize};

/// Closed set of article categories. Wire names are kebab-case
/// ("post-processing" etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Materials,
    Software,
    Hardware,
    PostProcessing,
    Applications,
    Industry,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Materials,
        Category::Software,
        Category::Hardware,
        Category::PostProcessing,
        Category::Applications,
        Category::Industry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Materials => "materials",
            Category::Software => "software",
            Category::Hardware => "hardware",
            Category::PostProcessing => "post-processing",
            Category::Applications => "applications",
            Category::Industry => "industry",
        }
    }
}

/// Category rules, first match wins. An article matching both materials and
/// hardware keywords is always "materials" because that row is checked first.
const CATEGORY_RULES: &[(Category, &[&str])] = &[
    (
        Category::Materials,
        &["material", "pla", "abs", "petg", "tpu", "resin", "filament", "nylon"],
    ),
    (
        Category::Software,
        &["software", "slicer", "cura", "prusa slicer", "bambu studio", "firmware"],
    ),
    (
        Category::Hardware,
        &["printer", "hardware", "extruder", "hotend", "bed", "frame"],
    ),
    (
        Category::PostProcessing,
        &["post-process", "post process", "postprocess", "finish", "paint", "sand", "support removal"],
    ),
    (
        Category::Applications,
        &["medical", "aerospace", "automotive", "construction", "food", "fashion"],
    ),
];

/// Manufacturer rules, first listed entry with any keyword hit wins.
const MAKER_RULES: &[(&str, &[&str])] = &[
    ("prusa", &["prusa"]),
    ("bambu", &["bambu"]),
    ("creality", &["creality", "ender", "cr-"]),
    ("formlabs", &["formlabs", "form 3", "form 4"]),
    ("ultimaker", &["ultimaker"]),
    ("stratasys", &["stratasys"]),
    ("3dsystems", &["3d systems"]),
    ("markforged", &["markforged"]),
    ("eos", &[" eos "]),
    ("hp", &["hp jet fusion", "hp multi jet"]),
    ("snapmaker", &["snapmaker"]),
    ("raise3d", &["raise3d"]),
    ("mimaki", &["mimaki"]),
    ("roland", &["roland dg"]),
];

/// Tag vocabulary; every hit is collected in declaration order.
const TAG_RULES: &[(&str, &[&str])] = &[
    ("PLA", &["pla"]),
    ("ABS", &["abs"]),
    ("PETG", &["petg"]),
    ("TPU", &["tpu"]),
    ("SLS", &["sls", "selective laser sintering"]),
    ("SLA", &["sla", "stereolithography"]),
    ("FDM", &["fdm", "fused deposition"]),
    ("MJF", &["mjf", "multi jet fusion"]),
    ("DMLS", &["dmls", "direct metal laser"]),
];

/// At most this many tags per article.
pub const MAX_TAGS: usize = 5;

fn haystack(title: &str, content: &str) -> String {
    format!("{} {}", title, content).to_lowercase()
}

fn any_hit(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// First matching category rule, else `Industry`.
pub fn detect_category(title: &str, content: &str) -> Category {
    let text = haystack(title, content);
    for (category, keywords) in CATEGORY_RULES {
        if any_hit(&text, keywords) {
            return *category;
        }
    }
    Category::Industry
}

/// First matching manufacturer, or `None` if no keyword occurs.
pub fn detect_maker(title: &str, content: &str) -> Option<&'static str> {
    let text = haystack(title, content);
    for (id, keywords) in MAKER_RULES {
        if any_hit(&text, keywords) {
            return Some(id);
        }
    }
    None
}

/// Every tag with at least one keyword hit, in vocabulary order, capped at
/// [`MAX_TAGS`].
pub fn detect_tags(title: &str, content: &str) -> Vec<&'static str> {
    let text = haystack(title, content);
    let mut found = Vec::new();
    for (tag, keywords) in TAG_RULES {
        if any_hit(&text, keywords) {
            found.push(*tag);
        }
    }
    found.truncate(MAX_TAGS);
    found
}
