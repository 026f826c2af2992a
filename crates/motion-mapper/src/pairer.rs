//! Pairs action entities with pose/gesture entities and resolves each pair
//! into a binding.

use crate::bindings::ACTION_NOT_FOUND;
use crate::output::{Binding, BindingAction, Bucket, Diagnostic, Method, OutputBuilder};
use crate::similarity::Resolution;
use crate::{ActionBindingResolver, ControlCatalog, Entity, EntityLabel, SimilarityResolver};
use std::sync::Arc;
use tracing::debug;

pub const GAME_NOT_FOUND: &str = "Game not found";

/// Static hold vs dynamic motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Pose,
    Gesture,
}

impl Modality {
    pub fn method(&self) -> Method {
        match self {
            Modality::Pose => Method::Hold,
            Modality::Gesture => Method::Click,
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            Modality::Pose => Bucket::Poses,
            Modality::Gesture => Bucket::Gestures,
        }
    }
}

/// Element of the action stream: tagged A, P or G
#[derive(Debug, Clone, Copy)]
enum StreamItem<'e> {
    Action(&'e Entity),
    Modality(Modality, &'e Entity),
}

impl<'e> StreamItem<'e> {
    fn entity(&self) -> &'e Entity {
        match self {
            StreamItem::Action(e) | StreamItem::Modality(_, e) => e,
        }
    }
}

struct ClauseScan<'e> {
    game: Option<&'e str>,
    stream: Vec<StreamItem<'e>>,
}

pub struct EntityPairer {
    resolver: SimilarityResolver,
    catalog: Arc<ControlCatalog>,
    bindings: ActionBindingResolver,
}

impl EntityPairer {
    pub fn new(resolver: SimilarityResolver, catalog: Arc<ControlCatalog>) -> Self {
        let bindings = ActionBindingResolver::from_catalog(&catalog);
        debug!(
            "pairer over {} games, match threshold {}",
            catalog.games.len(),
            resolver.threshold()
        );
        Self {
            resolver,
            catalog,
            bindings,
        }
    }

    pub fn catalog(&self) -> &ControlCatalog {
        &self.catalog
    }

    pub fn bindings(&self) -> &ActionBindingResolver {
        &self.bindings
    }

    /// Write scalar fields (last write wins) and collect the action stream
    fn scan<'e>(&self, entities: &'e [Entity], out: &mut OutputBuilder) -> ClauseScan<'e> {
        let mut game = None;
        let mut stream = Vec::new();
        for entity in entities {
            match entity.label {
                EntityLabel::Game => {
                    out.set_mode(&entity.text);
                    game = Some(entity.text.as_str());
                }
                EntityLabel::Orientation => out.set_orientation(&entity.text),
                EntityLabel::Landmark => out.set_landmark(&entity.text),
                EntityLabel::Action => stream.push(StreamItem::Action(entity)),
                EntityLabel::Pose => stream.push(StreamItem::Modality(Modality::Pose, entity)),
                EntityLabel::Gesture => {
                    stream.push(StreamItem::Modality(Modality::Gesture, entity))
                }
            }
        }
        ClauseScan { game, stream }
    }

    /// Adjacent pairing over one entity stream (whole-input mode).
    ///
    /// The stream is consumed in disjoint consecutive pairs; a pair must hold
    /// exactly one action. A trailing odd element is dropped.
    pub fn pair_adjacent(&self, entities: &[Entity], out: &mut OutputBuilder) {
        let scan = self.scan(entities, out);
        let Some(game) = scan.game else {
            out.mark_no_game();
            return;
        };

        let mut pairs = scan.stream.chunks_exact(2);
        for pair in &mut pairs {
            match (pair[0], pair[1]) {
                (StreamItem::Action(action), StreamItem::Modality(modality, motion))
                | (StreamItem::Modality(modality, motion), StreamItem::Action(action)) => {
                    self.bind(action, modality, motion, game, out);
                }
                (first, second) => {
                    debug!(
                        "dropping pair '{}' / '{}'",
                        first.entity().text,
                        second.entity().text
                    );
                    out.note(Diagnostic::AmbiguousPair {
                        first: first.entity().text.clone(),
                        second: second.entity().text.clone(),
                    });
                }
            }
        }
        if let [leftover] = pairs.remainder() {
            out.note(Diagnostic::DanglingEntity {
                text: leftover.entity().text.clone(),
            });
        }
    }

    /// Clause-at-a-time pairing (delimited mode): every pose/gesture in a
    /// clause binds to the last action of that clause.
    ///
    /// The no-game gate covers all clauses; otherwise the active game is the
    /// latest one seen so far, and clauses before it are not paired.
    pub fn pair_clauses(&self, clauses: &[(String, Vec<Entity>)], out: &mut OutputBuilder) {
        let has_game = clauses
            .iter()
            .flat_map(|(_, entities)| entities)
            .any(|e| e.label == EntityLabel::Game);
        if !has_game {
            for (_, entities) in clauses {
                self.scan(entities, out);
            }
            out.mark_no_game();
            return;
        }

        let mut active_game: Option<&str> = None;
        for (clause, entities) in clauses {
            let scan = self.scan(entities, out);
            if scan.game.is_some() {
                active_game = scan.game;
            }
            let Some(game) = active_game else {
                if !scan.stream.is_empty() {
                    out.note(Diagnostic::ClauseBeforeGame {
                        clause: clause.clone(),
                    });
                }
                continue;
            };

            let last_action = scan.stream.iter().rev().find_map(|item| match item {
                StreamItem::Action(a) => Some(*a),
                StreamItem::Modality(..) => None,
            });
            for item in &scan.stream {
                let StreamItem::Modality(modality, motion) = *item else {
                    continue;
                };
                match last_action {
                    Some(action) => self.bind(action, modality, motion, game, out),
                    None => out.note(Diagnostic::UnpairedModality {
                        text: motion.text.clone(),
                    }),
                }
            }
        }
    }

    /// Resolve an action/motion pair and append the binding
    fn bind(
        &self,
        action: &Entity,
        modality: Modality,
        motion: &Entity,
        game: &str,
        out: &mut OutputBuilder,
    ) {
        let vocabulary = match modality {
            Modality::Pose => &self.catalog.poses,
            Modality::Gesture => &self.catalog.gestures,
        };
        let files = self.resolver.resolve_detailed(&motion.text, vocabulary);
        note_resolution(out, &motion.text, &files);

        let class = self.resolve_action(&action.text, game, out);
        let key = match self.bindings.key_for(&class, game) {
            Some(key) => key.to_string(),
            None => {
                if class != GAME_NOT_FOUND && class != crate::similarity::NO_MATCH {
                    out.note(Diagnostic::UnboundAction {
                        action: class.clone(),
                        game: game.to_string(),
                    });
                }
                ACTION_NOT_FOUND.to_string()
            }
        };

        debug!(
            "'{}' + '{}' -> {} / {} [{}]",
            motion.text,
            action.text,
            files.label(),
            class,
            key
        );
        out.push(
            modality.bucket(),
            Binding {
                files: files.label().to_string(),
                action: BindingAction {
                    tmpt: action.text.clone(),
                    class,
                    method: modality.method(),
                    args: vec![key],
                },
            },
        );
    }

    fn resolve_action(&self, motion: &str, game: &str, out: &mut OutputBuilder) -> String {
        match self.catalog.actions_for(game) {
            Some(actions) => {
                let res = self.resolver.resolve_detailed(motion, actions);
                note_resolution(out, motion, &res);
                res.label().to_string()
            }
            None => {
                out.note(Diagnostic::UnknownGame {
                    game: game.to_string(),
                });
                GAME_NOT_FOUND.to_string()
            }
        }
    }

    /// Closest in-game action for a free-text motion phrase, `"none"` below
    /// the threshold, `"Game not found"` for an unknown game
    pub fn motion_to_action(&self, motion: &str, game: &str) -> String {
        match self.catalog.actions_for(game) {
            Some(actions) => self.resolver.resolve(motion, actions),
            None => GAME_NOT_FOUND.to_string(),
        }
    }
}

fn note_resolution(out: &mut OutputBuilder, target: &str, res: &Resolution) {
    match res {
        Resolution::Matched { .. } => {}
        Resolution::LowConfidence { best, score } => out.note(Diagnostic::LowConfidenceMatch {
            target: target.to_string(),
            best: best.clone(),
            score: *score,
        }),
        Resolution::NoCandidates => out.note(Diagnostic::NoCandidates {
            target: target.to_string(),
        }),
        Resolution::ProviderUnavailable { reason } => out.note(Diagnostic::ProviderFailure {
            target: target.to_string(),
            reason: reason.clone(),
        }),
    }
}
