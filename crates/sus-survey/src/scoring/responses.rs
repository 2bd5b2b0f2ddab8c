use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Number of items on the SUS instrument.
pub const QUESTION_COUNT: usize = 10;

pub const RESPONSES_REQUIRED: &str = "Responses object is required";

const QUESTION_KEYS: [&str; QUESTION_COUNT] =
    ["q1", "q2", "q3", "q4", "q5", "q6", "q7", "q8", "q9", "q10"];

const STATEMENTS: [&str; QUESTION_COUNT] = [
    "I think that I would like to use this system frequently",
    "I found the system unnecessarily complex",
    "I thought the system was easy to use",
    "I think that I would need the support of a technical person to be able to use this system",
    "I found the various functions in this system were well integrated",
    "I thought there was too much inconsistency in this system",
    "I would imagine that most people would learn to use this system very quickly",
    "I found the system very cumbersome to use",
    "I felt very confident using the system",
    "I needed to learn a lot of things before I could get going with this system",
];

/// Wording direction of a SUS item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Agreement signals good usability (odd items).
    Positive,
    /// Agreement signals poor usability (even items).
    Negative,
}

/// One of the ten fixed SUS items, numbered 1 through 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Question(u8);

impl Question {
    pub const fn ordered() -> [Self; QUESTION_COUNT] {
        [
            Self(1),
            Self(2),
            Self(3),
            Self(4),
            Self(5),
            Self(6),
            Self(7),
            Self(8),
            Self(9),
            Self(10),
        ]
    }

    pub fn new(number: u8) -> Option<Self> {
        (1..=QUESTION_COUNT as u8)
            .contains(&number)
            .then_some(Self(number))
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn key(self) -> &'static str {
        QUESTION_KEYS[self.index()]
    }

    pub const fn statement(self) -> &'static str {
        STATEMENTS[self.index()]
    }

    pub const fn polarity(self) -> Polarity {
        if self.0 % 2 == 1 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    const fn index(self) -> usize {
        self.0 as usize - 1
    }
}

/// A single Likert answer, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Likert(u8);

impl Likert {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Best-effort integer answers keyed by question; slots may be absent or out of range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Answers {
    slots: [Option<i64>; QUESTION_COUNT],
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: [i64; QUESTION_COUNT]) -> Self {
        Self {
            slots: values.map(Some),
        }
    }

    pub fn get(&self, question: Question) -> Option<i64> {
        self.slots[question.index()]
    }

    pub fn set(&mut self, question: Question, value: i64) {
        self.slots[question.index()] = Some(value);
    }

    pub fn remove(&mut self, question: Question) -> Option<i64> {
        self.slots[question.index()].take()
    }

    pub fn with(mut self, question: Question, value: i64) -> Self {
        self.set(question, value);
        self
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Question, i64)> + '_ {
        Question::ordered()
            .into_iter()
            .filter_map(|question| self.get(question).map(|value| (question, value)))
    }

    /// JSON object text in the `{"q1":4,...}` shape used for storage.
    pub fn to_json(&self) -> String {
        Value::from(*self).to_string()
    }
}

impl From<Answers> for Value {
    fn from(answers: Answers) -> Self {
        let map: Map<String, Value> = answers
            .iter()
            .map(|(question, value)| (question.key().to_string(), Value::from(value)))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Answers {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (question, value) in self.iter() {
            map.serialize_entry(question.key(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Answers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize(&ResponseInput::Untyped(value)))
    }
}

/// The encodings a response set may arrive in at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseInput {
    /// Already-normalized integer slots.
    Structured(Answers),
    /// JSON object text, as persisted alongside questionnaire records.
    Json(String),
    /// Arbitrary decoded payload; slot values may be numbers or numeric strings.
    Untyped(Value),
}

impl ResponseInput {
    /// Classify a decoded payload; a bare string is treated as JSON text.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Json(text),
            other => Self::Untyped(other),
        }
    }
}

impl From<Answers> for ResponseInput {
    fn from(answers: Answers) -> Self {
        Self::Structured(answers)
    }
}

impl From<Value> for ResponseInput {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<String> for ResponseInput {
    fn from(text: String) -> Self {
        Self::Json(text)
    }
}

impl From<&str> for ResponseInput {
    fn from(text: &str) -> Self {
        Self::Json(text.to_string())
    }
}

/// Result of coercing a single raw slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Absent,
    Integer(i64),
    Malformed,
}

/// Coerces every slot, or `None` when there is no response object at all.
fn coerce_slots(input: &ResponseInput) -> Option<[Slot; QUESTION_COUNT]> {
    match input {
        ResponseInput::Structured(answers) => Some(
            Question::ordered().map(|question| match answers.get(question) {
                Some(value) => Slot::Integer(value),
                None => Slot::Absent,
            }),
        ),
        ResponseInput::Json(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Some(slots_from_map(&map)),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "response payload is not valid JSON");
                None
            }
        },
        ResponseInput::Untyped(Value::Object(map)) => Some(slots_from_map(map)),
        ResponseInput::Untyped(_) => None,
    }
}

fn slots_from_map(map: &Map<String, Value>) -> [Slot; QUESTION_COUNT] {
    Question::ordered().map(|question| coerce_value(map.get(question.key())))
}

fn coerce_value(value: Option<&Value>) -> Slot {
    let coerced = match value {
        None | Some(Value::Null) => return Slot::Absent,
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(integral)),
        Some(Value::String(text)) => parse_integer(text),
        Some(_) => None,
    };

    coerced.map_or(Slot::Malformed, Slot::Integer)
}

fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
}

fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

/// Adapt any supported encoding into integer slots, dropping anything that is not an integer.
pub fn normalize(input: &ResponseInput) -> Answers {
    let mut answers = Answers::new();
    if let Some(slots) = coerce_slots(input) {
        for (question, slot) in Question::ordered().into_iter().zip(slots) {
            if let Slot::Integer(value) = slot {
                answers.set(question, value);
            }
        }
    }
    answers
}

/// Completeness verdict with one message per offending question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl Validation {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    fn missing() -> Self {
        Self::from_errors(vec![RESPONSES_REQUIRED.to_string()])
    }
}

pub fn required_message(question: Question) -> String {
    format!("Question {} is required", question.number())
}

pub fn range_message(question: Question) -> String {
    format!(
        "Question {} must be a number between {} and {}",
        question.number(),
        Likert::MIN,
        Likert::MAX
    )
}

/// Check completeness and per-slot validity without scoring.
pub fn validate(input: &ResponseInput) -> Validation {
    match ResponseSet::try_from_input(input) {
        Ok(_) => Validation::from_errors(Vec::new()),
        Err(validation) => validation,
    }
}

/// A complete set of ten in-range answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseSet {
    answers: [Likert; QUESTION_COUNT],
}

impl ResponseSet {
    pub fn try_from_input(input: &ResponseInput) -> Result<Self, Validation> {
        let Some(slots) = coerce_slots(input) else {
            return Err(Validation::missing());
        };

        let mut answers = [Likert(Likert::MIN); QUESTION_COUNT];
        let mut errors = Vec::new();

        for (question, slot) in Question::ordered().into_iter().zip(slots) {
            match slot {
                Slot::Absent => errors.push(required_message(question)),
                Slot::Integer(value) => match Likert::new(value) {
                    Some(likert) => answers[question.index()] = likert,
                    None => errors.push(range_message(question)),
                },
                Slot::Malformed => errors.push(range_message(question)),
            }
        }

        if errors.is_empty() {
            Ok(Self { answers })
        } else {
            Err(Validation::from_errors(errors))
        }
    }

    pub fn from_values(values: [i64; QUESTION_COUNT]) -> Result<Self, Validation> {
        Self::try_from_input(&ResponseInput::Structured(Answers::from_values(values)))
    }

    pub fn get(&self, question: Question) -> Likert {
        self.answers[question.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Question, Likert)> + '_ {
        Question::ordered()
            .into_iter()
            .map(|question| (question, self.get(question)))
    }

    pub fn answers(&self) -> Answers {
        self.iter()
            .fold(Answers::new(), |answers, (question, likert)| {
                answers.with(question, i64::from(likert.value()))
            })
    }
}
