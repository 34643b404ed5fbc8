//! Rule-based intent classification.
//!
//! The classifier is an ordered decision table: each row pairs a set of
//! compiled regexes with an [`Intent`] and an optional parameter extractor.
//! Rows are evaluated top to bottom and the first hit wins, so ties between
//! overlapping keyword sets resolve the same way on every call. Unmatched
//! input produces the distinguished unrecognized outcome (`intent: None`)
//! rather than an error; classification never fails.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::anyhow;
use regex::Regex;

/// Symbolic category describing what action a user command requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Goodbye,
    Help,
    Status,
    OrderFood,
    BookMovie,
    Shopping,
    SetReminder,
    Weather,
    News,
    Search,
}

impl Intent {
    /// Every intent the classifier can produce, in table order.
    pub const ALL: &'static [Intent] = &[
        Intent::Greeting,
        Intent::Goodbye,
        Intent::Help,
        Intent::Status,
        Intent::OrderFood,
        Intent::BookMovie,
        Intent::Shopping,
        Intent::SetReminder,
        Intent::Weather,
        Intent::News,
        Intent::Search,
    ];

    /// Stable wire/display name for this intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Goodbye => "goodbye",
            Intent::Help => "help",
            Intent::Status => "status",
            Intent::OrderFood => "order_food",
            Intent::BookMovie => "book_movie",
            Intent::Shopping => "shopping",
            Intent::SetReminder => "set_reminder",
            Intent::Weather => "weather",
            Intent::News => "news",
            Intent::Search => "search",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| anyhow!("unknown intent '{}'", s))
    }
}

/// How a classification was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationMethod {
    /// The rule table matched.
    Rules,
    /// The language-model assist produced it.
    Assist,
}

/// Outcome of classifying one command.
///
/// `intent: None` is the unrecognized sentinel; callers decide whether to
/// delegate to the assist or answer with a clarifying prompt.
#[derive(Debug, Clone)]
pub struct Classification {
    pub intent: Option<Intent>,
    pub parameters: BTreeMap<String, String>,
    pub confidence: f32,
    pub method: ClassificationMethod,
}

impl Classification {
    /// The unrecognized outcome.
    pub fn unrecognized() -> Self {
        Self {
            intent: None,
            parameters: BTreeMap::new(),
            confidence: 0.0,
            method: ClassificationMethod::Rules,
        }
    }
}

type Extractor = fn(&str, &mut BTreeMap<String, String>);

struct IntentRule {
    intent: Intent,
    patterns: Vec<Regex>,
    extract: Option<Extractor>,
}

/// Ordered rule table mapping command text to intents.
pub struct Classifier {
    rules: Vec<IntentRule>,
}

/// Confidence assigned to any rule-table hit.
const RULE_CONFIDENCE: f32 = 0.8;

const FOOD_ITEMS: &[&str] = &[
    "pizza", "burger", "biryani", "chicken", "chinese", "indian", "pasta",
];
const FOOD_PLATFORMS: &[&str] = &["swiggy", "zomato", "ubereats", "doordash"];
const SHOPPING_ITEMS: &[&str] = &[
    "dress", "shirt", "shoes", "book", "phone", "laptop", "clothes",
];
const SHOPPING_COLORS: &[&str] = &[
    "red", "blue", "black", "white", "green", "yellow", "pink",
];
const SHOPPING_PLATFORMS: &[&str] = &["amazon", "flipkart", "myntra", "ebay"];

impl Classifier {
    /// Builds the default rule table.
    ///
    /// All patterns are hand-written and compiled once here; a pattern that
    /// fails to compile is a bug in this table, so construction panics on it
    /// rather than threading an error through every caller.
    pub fn new() -> Self {
        let rule = |intent: Intent, patterns: &[&str], extract: Option<Extractor>| IntentRule {
            intent,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("invalid intent pattern"))
                .collect(),
            extract,
        };

        // Table order is the tie-break: the first matching row wins.
        let rules = vec![
            rule(
                Intent::Greeting,
                &[r"\b(hi|hello|hey|good morning|good afternoon|good evening)\b"],
                None,
            ),
            rule(
                Intent::Goodbye,
                &[r"\b(bye|goodbye|see you|farewell|exit|quit|stop)\b"],
                None,
            ),
            rule(
                Intent::Help,
                &[r"\b(help|what can you do|capabilities|commands)\b"],
                None,
            ),
            rule(Intent::Status, &[r"\b(status|how are you|what's up)\b"], None),
            rule(
                Intent::OrderFood,
                &[
                    r"\border\b.*\b(food|pizza|burger|biryani|meal|lunch|dinner)\b",
                    r"\b(swiggy|zomato|ubereats|doordash)\b.*\border\b",
                    r"\bi want\b.*\b(pizza|food|meal)\b",
                ],
                Some(extract_food),
            ),
            rule(
                Intent::BookMovie,
                &[
                    r"\bbook\b.*\b(movie|ticket|film|cinema)\b",
                    r"\b(bookmyshow|movie ticket|cinema ticket)\b",
                    r"\bwatch\b.*\b(movie|film)\b",
                ],
                Some(extract_movie),
            ),
            rule(
                Intent::Shopping,
                &[
                    r"\bbuy\b.*\b(dress|clothes|shirt|shoes|book|phone|laptop)\b",
                    r"\border\b.*\b(amazon|flipkart|myntra|ebay)\b",
                    r"\bi need\b.*\b(dress|clothes|item)\b",
                ],
                Some(extract_shopping),
            ),
            rule(
                Intent::SetReminder,
                &[r"\bremind me\b", r"\bset\b.*\breminder\b", r"\bschedule\b"],
                Some(extract_reminder),
            ),
            rule(
                Intent::Weather,
                &[r"\bweather\b", r"\btemperature\b", r"\bhow\b.*\b(hot|cold|warm)\b"],
                None,
            ),
            rule(
                Intent::News,
                &[r"\bnews\b", r"\bwhat.?s happening\b"],
                None,
            ),
            rule(
                Intent::Search,
                &[r"\bsearch for\b", r"\blook up\b", r"\bfind\b.*\binformation\b"],
                Some(extract_search),
            ),
        ];

        Self { rules }
    }

    /// Classifies one command.
    ///
    /// Pure function of the input and the static table: lowercases the text,
    /// walks the rules in order, and runs the winning row's extractor over
    /// the normalized text. Never fails; gibberish yields
    /// [`Classification::unrecognized`].
    pub fn classify(&self, command: &str) -> Classification {
        let normalized = command.trim().to_lowercase();
        if normalized.is_empty() {
            return Classification::unrecognized();
        }

        for rule in &self.rules {
            if rule.patterns.iter().any(|p| p.is_match(&normalized)) {
                let mut parameters = BTreeMap::new();
                if let Some(extract) = rule.extract {
                    extract(&normalized, &mut parameters);
                }
                return Classification {
                    intent: Some(rule.intent),
                    parameters,
                    confidence: RULE_CONFIDENCE,
                    method: ClassificationMethod::Rules,
                };
            }
        }

        Classification::unrecognized()
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn first_keyword(command: &str, keywords: &[&str]) -> Option<String> {
    keywords
        .iter()
        .find(|k| command.contains(*k))
        .map(|k| k.to_string())
}

fn extract_food(command: &str, parameters: &mut BTreeMap<String, String>) {
    if let Some(item) = first_keyword(command, FOOD_ITEMS) {
        parameters.insert("item".into(), item);
    }
    if let Some(platform) = first_keyword(command, FOOD_PLATFORMS) {
        parameters.insert("platform".into(), platform);
    }
    static QUANTITY: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\b(\d+)\b").expect("invalid quantity pattern"));
    if let Some(quantity) = QUANTITY.captures(command).and_then(|c| c.get(1)) {
        parameters.insert("quantity".into(), quantity.as_str().to_string());
    }
}

fn extract_movie(command: &str, parameters: &mut BTreeMap<String, String>) {
    let time = extract_time_expression(command);

    // Movie title is whatever trails the last "for"/"movie"/"film" marker,
    // minus the time expression.
    for marker in ["for", "movie", "film"] {
        if let Some((_, rest)) = command.rsplit_once(marker) {
            let mut title = rest.trim().trim_end_matches(['.', '!', '?']).to_string();
            if let Some(time) = &time {
                title = title.replace(time.as_str(), "");
            }
            let title = title.trim();
            if !title.is_empty() {
                parameters.insert("movie".into(), title.to_string());
                break;
            }
        }
    }
    if let Some(time) = time {
        parameters.insert("time".into(), time);
    }
}

fn extract_shopping(command: &str, parameters: &mut BTreeMap<String, String>) {
    if let Some(item) = first_keyword(command, SHOPPING_ITEMS) {
        parameters.insert("item".into(), item);
    }
    if let Some(color) = first_keyword(command, SHOPPING_COLORS) {
        parameters.insert("color".into(), color);
    }
    if let Some(platform) = first_keyword(command, SHOPPING_PLATFORMS) {
        parameters.insert("platform".into(), platform);
    }
}

fn extract_reminder(command: &str, parameters: &mut BTreeMap<String, String>) {
    if let Some(time) = extract_time_expression(command) {
        parameters.insert("time".into(), time);
    }
    for marker in ["remind me to", "remind me", "set a reminder to", "set reminder"] {
        if let Some((_, rest)) = command.split_once(marker) {
            let text = rest.trim().trim_end_matches(['.', '!', '?']);
            if !text.is_empty() {
                parameters.insert("text".into(), text.to_string());
                break;
            }
        }
    }
}

fn extract_search(command: &str, parameters: &mut BTreeMap<String, String>) {
    for marker in ["search for", "look up"] {
        if let Some((_, rest)) = command.split_once(marker) {
            let query = rest.trim().trim_end_matches(['.', '!', '?']);
            if !query.is_empty() {
                parameters.insert("query".into(), query.to_string());
                break;
            }
        }
    }
}

fn extract_time_expression(command: &str) -> Option<String> {
    static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
        [
            r"\bat\s*\d{1,2}(:\d{2})?\s*(pm|am)\b",
            r"\bin\s*\d+\s*(minutes?|hours?|days?)\b",
            r"\b\d{1,2}(:\d{2})?\s*(pm|am)\b",
            r"\b(today|tomorrow|tonight|next week)\b",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("invalid time pattern"))
        .collect()
    });
    TIME_PATTERNS
        .iter()
        .find_map(|re| re.find(command))
        .map(|m| m.as_str().to_string())
}
