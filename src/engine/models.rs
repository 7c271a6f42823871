//! Shared vocabulary for spots: table formats, positions, stacks, scenarios,
//! action kinds, and the composite spot key.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Table format & positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TableFormat {
    #[serde(rename = "6-max")]
    SixMax,
    #[serde(rename = "8-max")]
    EightMax,
}

impl TableFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TableFormat::SixMax => "6-max",
            TableFormat::EightMax => "8-max",
        }
    }

    /// Seats for this format, in table order.
    pub fn positions(self) -> &'static [Position] {
        match self {
            TableFormat::SixMax => POSITIONS_6MAX,
            TableFormat::EightMax => POSITIONS_8MAX,
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown table format: {0:?}")]
pub struct ParseTableFormatError(pub String);

impl FromStr for TableFormat {
    type Err = ParseTableFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6-max" => Ok(TableFormat::SixMax),
            "8-max" => Ok(TableFormat::EightMax),
            other => Err(ParseTableFormatError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Position {
    UTG,
    #[serde(rename = "UTG+1")]
    UTG1,
    LJ,
    HJ,
    CO,
    BTN,
    SB,
    BB,
}

pub const POSITIONS_6MAX: &[Position] = &[
    Position::LJ, Position::HJ, Position::CO,
    Position::BTN, Position::SB, Position::BB,
];

pub const POSITIONS_8MAX: &[Position] = &[
    Position::UTG, Position::UTG1, Position::LJ, Position::HJ,
    Position::CO, Position::BTN, Position::SB, Position::BB,
];

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::UTG => "UTG",
            Position::UTG1 => "UTG+1",
            Position::LJ => "LJ",
            Position::HJ => "HJ",
            Position::CO => "CO",
            Position::BTN => "BTN",
            Position::SB => "SB",
            Position::BB => "BB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown position: {0:?}")]
pub struct ParsePositionError(pub String);

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UTG" => Ok(Position::UTG),
            "UTG+1" => Ok(Position::UTG1),
            "LJ" => Ok(Position::LJ),
            "HJ" => Ok(Position::HJ),
            "CO" => Ok(Position::CO),
            "BTN" => Ok(Position::BTN),
            "SB" => Ok(Position::SB),
            "BB" => Ok(Position::BB),
            other => Err(ParsePositionError(other.to_string())),
        }
    }
}

/// Stack depths available for drilling, in big blinds, descending.
pub const STACKS: &[u32] = &[100, 50, 25, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10];

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Fold,
    Open,
    Call,
    Threebet,
    OpenShove,
    ThreebetShove,
}

pub const ACTIONS: &[ActionKind] = &[
    ActionKind::Fold,
    ActionKind::Open,
    ActionKind::Call,
    ActionKind::Threebet,
    ActionKind::OpenShove,
    ActionKind::ThreebetShove,
];

impl ActionKind {
    /// Wire name as used in range files and spot keys.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Open => "open",
            ActionKind::Call => "call",
            ActionKind::Threebet => "threebet",
            ActionKind::OpenShove => "open_shove",
            ActionKind::ThreebetShove => "threebet_shove",
        }
    }

    /// Human-facing button label.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Fold => "Fold",
            ActionKind::Open => "Open",
            ActionKind::Call => "Call",
            ActionKind::Threebet => "3-bet",
            ActionKind::OpenShove => "Open shove",
            ActionKind::ThreebetShove => "3-bet shove",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0:?}")]
pub struct ParseActionError(pub String);

impl FromStr for ActionKind {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTIONS
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// The action history before hero's decision: first in, or facing an open
/// from a named position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scenario {
    Open,
    VsOpen(Position),
}

impl Scenario {
    /// Readable sentence for the presentation layer.
    pub fn describe(self, hero: Position) -> String {
        match self {
            Scenario::Open => format!(
                "No one has entered the pot: you are in {hero} and may open."
            ),
            Scenario::VsOpen(villain) => format!(
                "{villain} has opened in front of you: you are in {hero} facing the raise."
            ),
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Open => write!(f, "open"),
            Scenario::VsOpen(p) => write!(f, "vs_open_{p}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scenario: {0:?}")]
pub struct ParseScenarioError(pub String);

impl FromStr for Scenario {
    type Err = ParseScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "open" {
            return Ok(Scenario::Open);
        }
        if let Some(pos) = s.strip_prefix("vs_open_") {
            let pos = pos
                .parse()
                .map_err(|_| ParseScenarioError(s.to_string()))?;
            return Ok(Scenario::VsOpen(pos));
        }
        Err(ParseScenarioError(s.to_string()))
    }
}

impl Serialize for Scenario {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scenario {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Spot key
// ---------------------------------------------------------------------------

/// Composite identifier of a preflop decision context. Serialized as
/// `<format>_<position>_<stack>_<scenario>`, e.g. `6-max_BTN_100_open` or
/// `8-max_UTG+1_20_vs_open_HJ`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpotKey {
    pub format: TableFormat,
    pub position: Position,
    pub stack: u32,
    pub scenario: Scenario,
}

impl SpotKey {
    pub fn new(format: TableFormat, position: Position, stack: u32, scenario: Scenario) -> SpotKey {
        SpotKey { format, position, stack, scenario }
    }

    /// An "open" scenario in the big blind cannot happen (there is always a
    /// prior action). Such spots are flagged for display but still graded.
    pub fn is_consistent(self) -> bool {
        !(self.scenario == Scenario::Open && self.position == Position::BB)
    }
}

impl fmt::Display for SpotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.format, self.position, self.stack, self.scenario
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSpotKeyError {
    #[error("spot key needs 4 underscore-separated parts: {0:?}")]
    Shape(String),
    #[error(transparent)]
    Format(#[from] ParseTableFormatError),
    #[error(transparent)]
    Position(#[from] ParsePositionError),
    #[error("bad stack depth in spot key: {0:?}")]
    Stack(String),
    #[error(transparent)]
    Scenario(#[from] ParseScenarioError),
}

impl FromStr for SpotKey {
    type Err = ParseSpotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, '_');
        let (Some(fmt), Some(pos), Some(stack), Some(scen)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseSpotKeyError::Shape(s.to_string()));
        };
        Ok(SpotKey {
            format: fmt.parse()?,
            position: pos.parse()?,
            stack: stack
                .parse()
                .map_err(|_| ParseSpotKeyError::Stack(stack.to_string()))?,
            scenario: scen.parse()?,
        })
    }
}

impl Serialize for SpotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SpotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
