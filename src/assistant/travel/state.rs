use std::fmt::Display;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub const DEFAULT_CURRENCY: &str = "USD";

const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "INR"];

const MONTHS: &[&str] = &[
    "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
    "jul", "july", "aug", "august", "sep", "sept", "september", "oct", "october", "nov",
    "november", "dec", "december",
];

const MONTH_PATTERN: &str = r"(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";
const DAY_PATTERN: &str = r"\d{1,2}(?:st|nd|rd|th)?";

// Compiled once; `None` only if a pattern is invalid, which leaves that fact unextracted.
static SCALED_BUDGET_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(k/trip|k\b|thousand|for trip)").ok());

static PLAIN_BUDGET_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"budget\s+(?:of\s+|is\s+)?\$?(\d[\d,]*)").ok());

static DESTINATION_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: to Lisbon, in New York, visiting Hoi An
    Regex::new(r"\b(?:[Tt]o|[Ii]n|[Vv]isit|[Vv]isiting)\s+([A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+){0,2})")
        .ok()
});

static DURATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*-?\s*(?:days?|nights?)\b").ok());

static TRAVELERS_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:people|travelers|travellers|persons|adults)\b").ok()
});

static TRAVEL_DATES_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // Matches: in June, from June 3 to June 10, on 5th May, 2025-06-03 to 2025-06-10
    let point = format!(
        r"(?:{m}\s+{d}|{d}\s+{m}|{m})",
        m = MONTH_PATTERN,
        d = DAY_PATTERN
    );
    let end = format!(
        r"(?:{m}\s+{d}|{d}\s+{m}|{d})",
        m = MONTH_PATTERN,
        d = DAY_PATTERN
    );
    let iso = r"\d{4}-\d{2}-\d{2}";
    Regex::new(&format!(
        r"(?i)\b(?:in|during|from|on|between)\s+({point}(?:\s*(?:-|to|until|through|and)\s*{end})?)\b|\b({iso}(?:\s*(?:-|to|until|through)\s*{iso})?)\b"
    ))
    .ok()
});

static CURRENCY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\b(usd|eur|gbp|jpy|aud|cad|chf|inr)\b").ok());

static SAVINGS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\bsave\s+\$?(\d+)").ok());

static EXPENSE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"spen[dt]\s+\$?(\d+)\s+(?:on|for)\s+(accommodation|transportation|food|activities|shopping|miscellaneous)",
    )
    .ok()
});

/// Rendered in prompts for any field the user has not told us yet.
pub const UNKNOWN: &str = "unknown";

pub fn or_unknown<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => UNKNOWN.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct TripDetails {
    pub destination: Option<String>,
    pub duration_days: Option<u32>,
    pub travel_dates: Option<String>,
    pub travelers: Option<u32>,
}

/// Running spend per category, serialized in this field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpenseCategories {
    pub accommodation: u64,
    pub transportation: u64,
    pub food: u64,
    pub activities: u64,
    pub shopping: u64,
    pub miscellaneous: u64,
}

impl ExpenseCategories {
    /// Adds to a category by name. Unknown names are ignored.
    pub fn add(&mut self, category: &str, amount: u64) -> bool {
        let slot = match category.to_lowercase().as_str() {
            "accommodation" => &mut self.accommodation,
            "transportation" => &mut self.transportation,
            "food" => &mut self.food,
            "activities" => &mut self.activities,
            "shopping" => &mut self.shopping,
            "miscellaneous" => &mut self.miscellaneous,
            _ => return false,
        };
        *slot = slot.saturating_add(amount);
        true
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct TravelBudgetInfo {
    pub total_budget: Option<u64>,
    pub trip_details: TripDetails,
    pub expense_categories: ExpenseCategories,
    pub savings_goal: Option<u64>,
    pub currency: String,
}

impl Default for TravelBudgetInfo {
    fn default() -> Self {
        Self {
            total_budget: None,
            trip_details: TripDetails::default(),
            expense_categories: ExpenseCategories::default(),
            savings_goal: None,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl TravelBudgetInfo {
    /// Picks up whatever trip facts a message states. Matching is keyword
    /// based; anything not recognised leaves the current value alone.
    pub fn update_from_message(&mut self, message: &str) {
        let lower = message.to_lowercase();

        if lower.contains("budget") {
            if let Some(budget) = extract_budget(&lower) {
                self.total_budget = Some(budget);
            }
        }
        if let Some(destination) = extract_destination(message) {
            self.trip_details.destination = Some(destination);
        }
        if let Some(days) = extract_number(&DURATION_PATTERN, &lower) {
            self.trip_details.duration_days = u32::try_from(days).ok();
        }
        if let Some(travelers) = extract_number(&TRAVELERS_PATTERN, &lower) {
            self.trip_details.travelers = u32::try_from(travelers).ok();
        }
        if let Some(dates) = extract_travel_dates(message) {
            self.trip_details.travel_dates = Some(dates);
        }
        if let Some(currency) = extract_currency(message) {
            self.currency = currency;
        }
        if let Some(goal) = extract_number(&SAVINGS_PATTERN, &lower) {
            self.savings_goal = Some(goal);
        }
        for (category, amount) in extract_expenses(&lower) {
            self.expense_categories.add(&category, amount);
        }
    }
}

fn extract_number(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<u64> {
    let re = pattern.as_ref()?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// `3k`, `3 thousand` and `3k/trip` are thousands; `3000 for trip` and
/// `budget of $3000` are taken as written.
fn extract_budget(lower: &str) -> Option<u64> {
    if let Some(captures) = SCALED_BUDGET_PATTERN.as_ref()?.captures(lower) {
        let amount: u64 = captures.get(1)?.as_str().parse().ok()?;
        return match captures.get(2)?.as_str() {
            "for trip" => Some(amount),
            _ => amount.checked_mul(1000),
        };
    }

    let raw = PLAIN_BUDGET_PATTERN
        .as_ref()?
        .captures(lower)?
        .get(1)?
        .as_str()
        .replace(',', "");
    raw.parse().ok()
}

fn is_month(word: &str) -> bool {
    MONTHS.contains(&word.to_lowercase().as_str())
}

fn extract_destination(message: &str) -> Option<String> {
    let re = DESTINATION_PATTERN.as_ref()?;
    let place = re
        .captures_iter(message)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
        .find(|place| {
            let first_word = place.split_whitespace().next().unwrap_or_default();
            !CURRENCIES.contains(&place.as_str()) && !is_month(first_word)
        });
    place
}

fn extract_travel_dates(message: &str) -> Option<String> {
    let captures = TRAVEL_DATES_PATTERN.as_ref()?.captures(message)?;
    let dates = captures.get(1).or_else(|| captures.get(2))?;
    Some(dates.as_str().trim().to_string())
}

fn extract_currency(message: &str) -> Option<String> {
    let captures = CURRENCY_PATTERN.as_ref()?.captures(message)?;
    Some(captures.get(1)?.as_str().to_uppercase())
}

fn extract_expenses(lower: &str) -> Vec<(String, u64)> {
    let Some(re) = EXPENSE_PATTERN.as_ref() else {
        return Vec::new();
    };
    re.captures_iter(lower)
        .filter_map(|captures| {
            let amount = captures.get(1)?.as_str().parse().ok()?;
            Some((captures.get(2)?.as_str().to_string(), amount))
        })
        .collect()
}
