//! Entity-death hook: rolls the configured drop table for the dead
//! entity and mutates the event's drop list.

use rand::Rng;

use crate::color::Colorizer;
use crate::config::{render_template, Messages};
use crate::loot::{ItemStack, LootResolver, MOBS_CATEGORY};

/// A death event as handed over by the host. The drop list is the
/// host's pre-populated default drops and is mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDeathEvent {
    pub entity_type: String,
    pub is_player: bool,
    pub drops: Vec<ItemStack>,
}

/// Sink for server-wide diagnostic messages.
pub trait Broadcaster {
    fn broadcast(&mut self, message: &str);
}

/// The death handler receives exactly the collaborators it uses; it
/// holds no plugin-wide context.
pub struct DeathHandler<'a, T: LootResolver> {
    tables: &'a T,
    messages: &'a Messages,
    colorizer: &'a Colorizer,
}

impl<'a, T: LootResolver> DeathHandler<'a, T> {
    pub fn new(tables: &'a T, messages: &'a Messages, colorizer: &'a Colorizer) -> Self {
        Self {
            tables,
            messages,
            colorizer,
        }
    }

    /// Resolve the drop for one death event. Misconfigured tables are
    /// reported through `sink` and leave the drop list untouched; every
    /// path returns promptly, this runs inside the host's event
    /// dispatch.
    pub fn handle(
        &self,
        event: &mut EntityDeathEvent,
        sink: &mut impl Broadcaster,
        rng: &mut impl Rng,
    ) {
        if event.is_player {
            return;
        }

        let key = event.entity_type.to_uppercase();
        let duplicates = self.tables.count_tables(MOBS_CATEGORY, &key);
        if duplicates == 0 {
            return;
        }
        if duplicates > 1 {
            let message = render_template(
                &self.messages.duplicates_found,
                &[
                    ("{duplicates}", duplicates.to_string().as_str()),
                    ("{mob-drop-table}", capitalize(&event.entity_type).as_str()),
                    ("{mob-drop-table-upper}", key.as_str()),
                ],
            );
            sink.broadcast(&self.colorizer.process(&message));
            return;
        }

        let total = self.tables.max_cumulative_chance(MOBS_CATEGORY, &key);
        if total != Some(100.0) {
            let message = render_template(
                &self.messages.max_chance_invalid,
                &[
                    ("{mob-drop-table}", capitalize(&event.entity_type).as_str()),
                    ("{mob-drop-table-upper}", key.as_str()),
                ],
            );
            sink.broadcast(&self.colorizer.process(&message));
            return;
        }

        let Some(drop) = self.tables.roll_drop(MOBS_CATEGORY, &key, rng) else {
            return;
        };

        if self.tables.replaces_default_drops(MOBS_CATEGORY, &key) {
            event.drops.clear();
        }
        event.drops.push(drop);
    }
}

/// `ZOMBIE` -> `Zombie`, for display in diagnostics.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
