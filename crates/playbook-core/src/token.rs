//! Tokens placed on the court: players, generic markers and the ball.

use crate::roster::PlayerRecord;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a token.
pub type TokenId = Uuid;

/// Lower bound of the court percentage space.
pub const COORD_MIN: f64 = 0.0;
/// Upper bound of the court percentage space.
pub const COORD_MAX: f64 = 100.0;
/// Where newly added tokens are placed (center court).
pub const DEFAULT_POSITION: f64 = 50.0;

/// Clamp a coordinate into `[0, 100]`. NaN collapses to the lower bound.
pub fn clamp_coord(value: f64) -> f64 {
    value.max(COORD_MIN).min(COORD_MAX)
}

/// Identifier of a concrete roster member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// What a token represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Generic offensive marker, identified only by its label.
    Offense,
    /// Opposing marker, identified only by its label.
    Defense,
    Ball,
    /// A concrete roster member.
    Player,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Offense => "offense",
            TokenKind::Defense => "defense",
            TokenKind::Ball => "ball",
            TokenKind::Player => "player",
        };
        f.pad(name)
    }
}

/// Binding of a player token to a roster member, with cached display fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard {
    pub player_ref: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl From<&PlayerRecord> for PlayerCard {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            player_ref: record.id.clone(),
            name: record.name.clone(),
            number: record.number,
            photo: record.photo.clone(),
        }
    }
}

/// A placed entity with court-space coordinates in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerCard>,
    pub x: f64,
    pub y: f64,
}

impl Token {
    /// Create an identity-free token at center court.
    pub fn new(kind: TokenKind, label: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label,
            player: None,
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
        }
    }

    /// Create a player token bound to a roster member at center court.
    pub fn player(card: PlayerCard) -> Self {
        Self {
            player: Some(card),
            ..Self::new(TokenKind::Player, None)
        }
    }

    /// Builder-style position setter (clamped).
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    /// Set the position, clamping both axes into the court.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = clamp_coord(x);
        self.y = clamp_coord(y);
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_ball(&self) -> bool {
        self.kind == TokenKind::Ball
    }

    /// The roster member this token is bound to, if any.
    pub fn player_ref(&self) -> Option<&PlayerId> {
        self.player.as_ref().map(|card| &card.player_ref)
    }

    /// Text a renderer would draw inside the token.
    pub fn display_label(&self) -> String {
        match (&self.player, &self.label) {
            (Some(card), _) => card
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| card.name.clone()),
            (None, Some(label)) => label.clone(),
            (None, None) => String::new(),
        }
    }
}
