//! Role abstraction: converting between roster-bound player tokens and
//! portable, position-numbered tokens.
//!
//! A saved play never references people. Each player token is stored as an
//! `offense` token labelled with its position slot (`"1"`..`"5"`) in the
//! starting five at save time. Loading binds each slot label to whoever
//! occupies that slot in the target lineup, so the label encodes the *slot*,
//! not the person.

use crate::frame::{Frame, FrameSequence};
use crate::roster::{PlayerRecord, Roster, STARTER_SLOTS};
use crate::token::{PlayerCard, PlayerId, Token, TokenKind};
use uuid::Uuid;

/// Label given to a player token whose player is not in the starting five.
pub const UNMAPPED_LABEL: &str = "?";

/// Position slot encoded by a token label, if it is an integer in `1..=5`.
pub fn slot_from_label(label: &str) -> Option<usize> {
    label
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|slot| (1..=STARTER_SLOTS).contains(slot))
}

/// Players that could not be mapped to a slot while abstracting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbstractionReport {
    /// Distinct players saved as `"?"`, in first-seen order.
    pub unmapped: Vec<PlayerId>,
}

impl AbstractionReport {
    pub fn is_clean(&self) -> bool {
        self.unmapped.is_empty()
    }
}

/// Slots that could not be bound while instantiating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstantiationReport {
    /// Number of tokens bound to a player across all frames.
    pub bound: usize,
    /// Distinct slots left as unbound placeholders, ascending.
    pub unbound_slots: Vec<usize>,
    /// Stored tokens discarded because they broke a per-frame uniqueness rule.
    pub dropped: usize,
}

impl InstantiationReport {
    pub fn is_clean(&self) -> bool {
        self.unbound_slots.is_empty() && self.dropped == 0
    }
}

/// Rewrite one token into its portable form.
///
/// Returns the unmapped player, if the token's player is not a starter.
fn abstract_token(token: &Token, roster: &Roster) -> (Token, Option<PlayerId>) {
    let mut out = Token {
        id: Uuid::new_v4(),
        player: None,
        ..token.clone()
    };

    if token.kind != TokenKind::Player {
        return (out, None);
    }

    out.kind = TokenKind::Offense;
    match token.player_ref().map(|id| (id, roster.slot_of(id))) {
        Some((_, Some(slot))) => {
            out.label = Some(slot.to_string());
            (out, None)
        }
        Some((id, None)) => {
            out.label = Some(UNMAPPED_LABEL.to_string());
            (out, Some(id.clone()))
        }
        None => {
            out.label = Some(UNMAPPED_LABEL.to_string());
            (out, None)
        }
    }
}

/// Convert live frames into their roster-independent form against the
/// *current* starters array.
///
/// Every token gets a fresh id. Player tokens become `offense` tokens labelled
/// with their slot, or `"?"` when the player is not a starter (identity is
/// discarded). Other tokens keep their label and coordinates.
pub fn abstract_frames<'a, I>(frames: I, roster: &Roster) -> (Vec<Frame>, AbstractionReport)
where
    I: IntoIterator<Item = &'a Frame>,
{
    let mut report = AbstractionReport::default();
    let frames = frames
        .into_iter()
        .map(|frame| {
            let tokens = frame
                .tokens
                .iter()
                .map(|token| {
                    let (out, unmapped) = abstract_token(token, roster);
                    if let Some(id) = unmapped {
                        if !report.unmapped.contains(&id) {
                            log::warn!("Player {} is not a starter; saved as '{}'", id, UNMAPPED_LABEL);
                            report.unmapped.push(id);
                        }
                    }
                    out
                })
                .collect();
            Frame {
                tokens,
                paths: frame.paths.clone(),
            }
        })
        .collect();
    (frames, report)
}

/// Bind portable frames to a concrete lineup.
///
/// Offense tokens labelled `1..=5` become player tokens for the starter in
/// that slot (fresh id, same coordinates, display fields from the roster).
/// If the slot is empty, its player is unknown, or the player is already on
/// the frame, the token stays an unbound placeholder. Balls get a fresh id;
/// everything else passes through unchanged.
///
/// Stored data is untrusted: coordinates are clamped to the court, a `player`
/// token without a player card becomes a `"?"` placeholder, and tokens that
/// would repeat the ball, a defense label or a player on the same frame are
/// dropped.
pub fn instantiate_frames<'a, I>(frames: I, roster: &Roster) -> (Vec<Frame>, InstantiationReport)
where
    I: IntoIterator<Item = &'a Frame>,
{
    let mut report = InstantiationReport::default();
    let frames = frames
        .into_iter()
        .map(|frame| {
            let mut out = Frame {
                tokens: Vec::with_capacity(frame.tokens.len()),
                paths: frame.paths.clone(),
            };
            for token in &frame.tokens {
                let mut token = instantiate_token(token, roster, &out, &mut report);
                token.set_position(token.x, token.y);
                let kind = token.kind;
                if !out.add_token(token) {
                    log::warn!("Dropping duplicate {} token from stored frame", kind);
                    report.dropped += 1;
                }
            }
            out
        })
        .collect();
    report.unbound_slots.sort_unstable();
    (frames, report)
}

fn instantiate_token(token: &Token, roster: &Roster, frame: &Frame, report: &mut InstantiationReport) -> Token {
    match token.kind {
        TokenKind::Ball => Token {
            id: Uuid::new_v4(),
            ..token.clone()
        },
        TokenKind::Offense => {
            let Some(slot) = token.label.as_deref().and_then(slot_from_label) else {
                return token.clone();
            };
            let bound = roster
                .starter(slot)
                .map(|record| Token::player(PlayerCard::from(record)).at(token.x, token.y))
                .filter(|candidate| frame.can_add(candidate));
            match bound {
                Some(player) => {
                    report.bound += 1;
                    player
                }
                None => {
                    if !report.unbound_slots.contains(&slot) {
                        log::warn!("Slot {} has no known starter; keeping placeholder", slot);
                        report.unbound_slots.push(slot);
                    }
                    token.clone()
                }
            }
        }
        TokenKind::Player if token.player.is_none() => Token {
            kind: TokenKind::Offense,
            label: Some(UNMAPPED_LABEL.to_string()),
            ..token.clone()
        },
        TokenKind::Defense | TokenKind::Player => token.clone(),
    }
}

/// Which tokens a substitution rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Substitution {
    /// Tokens bound to this player.
    Player(PlayerId),
    /// Unbound offense tokens carrying this label, e.g. `"?"` or an empty slot number.
    Unbound(String),
}

impl Substitution {
    fn matches(&self, token: &Token) -> bool {
        match self {
            Substitution::Player(id) => token.player_ref() == Some(id),
            Substitution::Unbound(label) => {
                token.kind == TokenKind::Offense
                    && token.player.is_none()
                    && token.label.as_deref() == Some(label.as_str())
            }
        }
    }
}

/// What a substitution pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionReport {
    /// Tokens rebound to the incoming player.
    pub rewritten: usize,
    /// Frames where the incoming player was already present and took the outgoing player's place.
    pub swapped: usize,
    /// Frames left alone because the incoming player was already present and
    /// there was no outgoing player to swap with.
    pub skipped: usize,
}

impl SubstitutionReport {
    pub fn changed(&self) -> bool {
        self.rewritten > 0
    }
}

/// Rebind every frame's matching token to `incoming` in one pass, preserving
/// ids and coordinates.
///
/// Only the first matching token per frame is rewritten so a frame never
/// holds two tokens for the same player. If `incoming` already appears on a
/// frame, a bound outgoing player swaps places with it; an unbound selector
/// leaves that frame untouched.
pub fn substitute(frames: &mut FrameSequence, outgoing: &Substitution, incoming: &PlayerRecord) -> SubstitutionReport {
    let mut report = SubstitutionReport::default();
    if *outgoing == Substitution::Player(incoming.id.clone()) {
        return report;
    }
    let incoming_card = PlayerCard::from(incoming);

    frames.update_each(|frame| {
        let Some(target) = frame.tokens.iter().position(|t| outgoing.matches(t)) else {
            return false;
        };
        let existing = frame
            .tokens
            .iter()
            .position(|t| t.player_ref() == Some(&incoming.id));

        if let Some(existing) = existing {
            match frame.tokens[target].player.clone() {
                Some(outgoing_card) => {
                    frame.tokens[existing].player = Some(outgoing_card);
                    report.swapped += 1;
                }
                None => {
                    report.skipped += 1;
                    return false;
                }
            }
        }

        let token = &mut frame.tokens[target];
        token.kind = TokenKind::Player;
        token.label = None;
        token.player = Some(incoming_card.clone());
        report.rewritten += 1;
        true
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenId;

    fn pool() -> Vec<PlayerRecord> {
        ["A", "B", "C", "D", "E", "F"]
            .iter()
            .enumerate()
            .map(|(i, id)| PlayerRecord::new(*id, format!("Player {id}")).with_number(i as u32 + 1))
            .collect()
    }

    fn roster(starters: [&str; 5]) -> Roster {
        Roster::new(pool()).with_starters(starters)
    }

    fn bound(id: &str, roster: &Roster) -> Token {
        let record = roster.player(&PlayerId::from(id)).unwrap();
        Token::player(PlayerCard::from(record))
    }

    fn only_token(frames: &[Frame]) -> &Token {
        &frames[0].tokens[0]
    }

    #[test]
    fn test_slot_from_label() {
        assert_eq!(slot_from_label("3"), Some(3));
        assert_eq!(slot_from_label("0"), None);
        assert_eq!(slot_from_label("6"), None);
        assert_eq!(slot_from_label("?"), None);
        assert_eq!(slot_from_label("-1"), None);
    }

    #[test]
    fn test_abstract_player_to_slot() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let frame = Frame {
            tokens: vec![bound("C", &roster).at(30.0, 40.0)],
            paths: Vec::new(),
        };
        let (frames, report) = abstract_frames([&frame], &roster);
        let token = only_token(&frames);
        assert_eq!(token.kind, TokenKind::Offense);
        assert_eq!(token.label.as_deref(), Some("3"));
        assert_eq!((token.x, token.y), (30.0, 40.0));
        assert!(token.player.is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn test_abstract_non_starter_becomes_unmapped() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let frame = Frame {
            tokens: vec![bound("F", &roster), bound("F", &roster)],
            paths: Vec::new(),
        };
        let (frames, report) = abstract_frames([&frame, &frame], &roster);
        assert_eq!(only_token(&frames).label.as_deref(), Some(UNMAPPED_LABEL));
        assert_eq!(report.unmapped, vec![PlayerId::from("F")]);
    }

    #[test]
    fn test_abstract_refreshes_ids_but_keeps_markers() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let ball = Token::new(TokenKind::Ball, None).at(10.0, 20.0);
        let defender = Token::new(TokenKind::Defense, Some("X2".into())).at(60.0, 70.0);
        let frame = Frame {
            tokens: vec![ball.clone(), defender.clone()],
            paths: Vec::new(),
        };
        let (frames, _) = abstract_frames([&frame], &roster);
        let out = &frames[0].tokens;
        assert_ne!(out[0].id, ball.id);
        assert_eq!(out[0].position(), ball.position());
        assert_ne!(out[1].id, defender.id);
        assert_eq!(out[1].label.as_deref(), Some("X2"));
    }

    fn stored_slot_three() -> Frame {
        Frame {
            tokens: vec![Token::new(TokenKind::Offense, Some("3".into())).at(30.0, 40.0)],
            paths: Vec::new(),
        }
    }

    #[test]
    fn test_instantiate_same_roster() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let (frames, report) = instantiate_frames([&stored_slot_three()], &roster);
        let token = only_token(&frames);
        assert_eq!(token.kind, TokenKind::Player);
        assert_eq!(token.player_ref(), Some(&PlayerId::from("C")));
        assert_eq!((token.x, token.y), (30.0, 40.0));
        assert_eq!(token.player.as_ref().and_then(|c| c.number), Some(3));
        assert_eq!(report.bound, 1);
    }

    #[test]
    fn test_instantiate_reordered_roster() {
        let stored = stored_slot_three();

        let (frames, _) = instantiate_frames([&stored], &roster(["E", "D", "C", "B", "A"]));
        assert_eq!(only_token(&frames).player_ref(), Some(&PlayerId::from("C")));

        let (frames, _) = instantiate_frames([&stored], &roster(["C", "B", "A", "D", "E"]));
        let token = only_token(&frames);
        assert_eq!(token.player_ref(), Some(&PlayerId::from("A")));
        assert_eq!((token.x, token.y), (30.0, 40.0));
    }

    #[test]
    fn test_instantiate_unmapped_slot_keeps_placeholder() {
        let mut roster = roster(["A", "B", "C", "D", "E"]);
        roster.set_starter(3, None);
        let stored = stored_slot_three();
        let (frames, report) = instantiate_frames([&stored], &roster);
        assert_eq!(only_token(&frames), &stored.tokens[0]);
        assert_eq!(report.unbound_slots, vec![3]);
        assert_eq!(report.bound, 0);
    }

    #[test]
    fn test_instantiate_unknown_starter() {
        let roster = Roster::new(pool()).with_starters(["A", "B", "ghost", "D", "E"]);
        let (frames, report) = instantiate_frames([&stored_slot_three()], &roster);
        assert_eq!(only_token(&frames).kind, TokenKind::Offense);
        assert_eq!(report.unbound_slots, vec![3]);
    }

    #[test]
    fn test_instantiate_duplicate_slot_binds_once() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let frame = Frame {
            tokens: vec![
                Token::new(TokenKind::Offense, Some("3".into())),
                Token::new(TokenKind::Offense, Some("3".into())),
            ],
            paths: Vec::new(),
        };
        let (frames, _) = instantiate_frames([&frame], &roster);
        assert_eq!(frames[0].tokens[0].kind, TokenKind::Player);
        assert_eq!(frames[0].tokens[1].kind, TokenKind::Offense);
    }

    #[test]
    fn test_instantiate_passes_markers_through() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let ball = Token::new(TokenKind::Ball, None).at(5.0, 5.0);
        let defender = Token::new(TokenKind::Defense, Some("X1".into()));
        let unmapped = Token::new(TokenKind::Offense, Some(UNMAPPED_LABEL.into()));
        let frame = Frame {
            tokens: vec![ball.clone(), defender.clone(), unmapped.clone()],
            paths: Vec::new(),
        };
        let (frames, report) = instantiate_frames([&frame], &roster);
        let out = &frames[0].tokens;
        assert_ne!(out[0].id, ball.id);
        assert_eq!(out[0].position(), ball.position());
        assert_eq!(out[1], defender);
        assert_eq!(out[2], unmapped);
        assert!(report.is_clean());
    }

    #[test]
    fn test_instantiate_enforces_frame_rules() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let mut frame = Frame {
            tokens: vec![
                Token::new(TokenKind::Ball, None).at(5.0, 5.0),
                Token::new(TokenKind::Ball, None).at(9.0, 9.0),
                Token::new(TokenKind::Defense, Some("X1".into())),
                Token::new(TokenKind::Defense, Some("X1".into())),
            ],
            paths: Vec::new(),
        };
        // Out of range, as a hand-edited file might be
        frame.tokens[0].x = 150.0;
        frame.tokens[0].y = -20.0;

        let (frames, report) = instantiate_frames([&frame], &roster);
        let out = &frames[0].tokens;
        assert_eq!(out.len(), 2);
        assert_eq!(out.iter().filter(|t| t.is_ball()).count(), 1);
        assert_eq!((out[0].x, out[0].y), (100.0, 0.0));
        assert_eq!(report.dropped, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_instantiate_cardless_player_becomes_placeholder() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let frame = Frame {
            tokens: vec![Token::new(TokenKind::Player, None).at(20.0, 30.0)],
            paths: Vec::new(),
        };
        let (frames, report) = instantiate_frames([&frame], &roster);
        let token = only_token(&frames);
        assert_eq!(token.kind, TokenKind::Offense);
        assert_eq!(token.label.as_deref(), Some(UNMAPPED_LABEL));
        assert_eq!((token.x, token.y), (20.0, 30.0));
        assert_eq!(report.dropped, 0);
    }

    fn sequence_with(tokens_per_frame: Vec<Vec<Token>>) -> FrameSequence {
        FrameSequence::from_frames(
            tokens_per_frame
                .into_iter()
                .map(|tokens| Frame { tokens, paths: Vec::new() })
                .collect(),
        )
    }

    #[test]
    fn test_substitute_rebinds_every_frame() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let first = bound("B", &roster).at(10.0, 10.0);
        let second = bound("B", &roster).at(20.0, 30.0);
        let ids: Vec<TokenId> = vec![first.id, second.id];
        let mut frames = sequence_with(vec![vec![first], vec![second], vec![]]);

        let incoming = roster.player(&PlayerId::from("F")).unwrap();
        let report = substitute(&mut frames, &Substitution::Player(PlayerId::from("B")), incoming);

        assert_eq!(report.rewritten, 2);
        let rebound: Vec<&Token> = frames.iter().flat_map(|f| f.tokens.iter()).collect();
        assert_eq!(rebound[0].player_ref(), Some(&PlayerId::from("F")));
        assert_eq!(rebound[0].id, ids[0]);
        assert_eq!(rebound[1].position(), kurbo::Point::new(20.0, 30.0));
        assert_eq!(rebound[1].id, ids[1]);
    }

    #[test]
    fn test_substitute_fills_unmapped_slot() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let mut frames = sequence_with(vec![vec![
            Token::new(TokenKind::Offense, Some(UNMAPPED_LABEL.into())).at(70.0, 20.0),
            Token::new(TokenKind::Offense, Some(UNMAPPED_LABEL.into())),
        ]]);
        let incoming = roster.player(&PlayerId::from("F")).unwrap();
        let report = substitute(&mut frames, &Substitution::Unbound(UNMAPPED_LABEL.into()), incoming);

        assert_eq!(report.rewritten, 1);
        let frame = frames.get(0).unwrap();
        assert_eq!(frame.tokens[0].player_ref(), Some(&PlayerId::from("F")));
        assert_eq!(frame.tokens[0].position(), kurbo::Point::new(70.0, 20.0));
        assert_eq!(frame.tokens[1].label.as_deref(), Some(UNMAPPED_LABEL));
    }

    #[test]
    fn test_substitute_swaps_when_incoming_present() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let mut frames = sequence_with(vec![vec![bound("A", &roster), bound("B", &roster)]]);
        let incoming = roster.player(&PlayerId::from("B")).unwrap();
        let report = substitute(&mut frames, &Substitution::Player(PlayerId::from("A")), incoming);

        assert_eq!(report.swapped, 1);
        let frame = frames.get(0).unwrap();
        assert_eq!(frame.tokens[0].player_ref(), Some(&PlayerId::from("B")));
        assert_eq!(frame.tokens[1].player_ref(), Some(&PlayerId::from("A")));
    }

    #[test]
    fn test_substitute_unbound_skips_when_incoming_present() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let mut frames = sequence_with(vec![vec![
            bound("A", &roster),
            Token::new(TokenKind::Offense, Some(UNMAPPED_LABEL.into())),
        ]]);
        let before = frames.clone();
        let incoming = roster.player(&PlayerId::from("A")).unwrap();
        let report = substitute(&mut frames, &Substitution::Unbound(UNMAPPED_LABEL.into()), incoming);

        assert_eq!(report.skipped, 1);
        assert!(!report.changed());
        assert_eq!(frames, before);
    }

    #[test]
    fn test_substitute_same_player_is_noop() {
        let roster = roster(["A", "B", "C", "D", "E"]);
        let mut frames = sequence_with(vec![vec![bound("A", &roster)]]);
        let incoming = roster.player(&PlayerId::from("A")).unwrap();
        let report = substitute(&mut frames, &Substitution::Player(PlayerId::from("A")), incoming);
        assert_eq!(report, SubstitutionReport::default());
    }
}
