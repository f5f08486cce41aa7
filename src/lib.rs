//! voxdrops — drop tables and RGB chat colorization for a voxel-sandbox
//! multiplayer server.
//!
//! The plugin ties three pieces together: an `/admin` command with paged
//! help and reload, an entity-death hook that rolls weighted drops
//! against configurable tables, and a colorization engine that turns
//! legacy `&`-codes and gradient/rainbow markup into the chat color
//! codes the host version supports. The host engine stays behind trait
//! seams ([`command::CommandSender`], [`events::Broadcaster`]); nothing
//! here touches the network or the event loop.

pub mod color;
pub mod command;
pub mod config;
pub mod events;
pub mod loot;

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{info, warn};

use color::Colorizer;
use command::{AdminCommand, AdminOutcome, CommandSender};
use config::{Messages, Settings, MESSAGES_FILE, SETTINGS_FILE, TABLES_FILE};
use events::{Broadcaster, DeathHandler, EntityDeathEvent};
use loot::DropTables;

/// The plugin instance. Constructed once at enable time; `reload`
/// re-reads everything from the data directory, including the colorizer
/// since its capability flag derives from settings.
pub struct Plugin {
    data_dir: PathBuf,
    settings: Settings,
    messages: Messages,
    tables: DropTables,
    colorizer: Colorizer,
}

impl Plugin {
    /// Load the plugin from its data directory. Loading is lenient:
    /// missing or broken files fall back to defaults with a warning.
    pub fn load(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let settings = Settings::load_from_path(&data_dir.join(SETTINGS_FILE));
        let messages = Messages::load_from_path(&data_dir.join(MESSAGES_FILE));
        let tables = DropTables::load_or_default(&data_dir.join(TABLES_FILE));

        for finding in tables.validate() {
            warn!("Drop table problem: {finding}");
        }

        let colorizer = Colorizer::new(settings.host_version);
        info!(
            host_version = settings.host_version,
            true_color = colorizer.supports_true_color(),
            "voxdrops loaded"
        );

        Self {
            data_dir,
            settings,
            messages,
            tables,
            colorizer,
        }
    }

    /// Re-read settings, messages and tables from disk.
    pub fn reload(&mut self) {
        *self = Self::load(std::mem::take(&mut self.data_dir));
    }

    /// Entry point for the host's command dispatch.
    pub fn handle_admin_command(&mut self, sender: &mut impl CommandSender, args: &[&str]) {
        let outcome = AdminCommand::new(&self.settings, &self.messages, &self.colorizer)
            .execute(sender, args);
        if outcome == AdminOutcome::ReloadRequested {
            self.reload();
        }
    }

    /// Entry point for the host's tab-completion callback.
    pub fn tab_complete_admin(&self, sender: &impl CommandSender, args: &[&str]) -> Vec<String> {
        AdminCommand::new(&self.settings, &self.messages, &self.colorizer)
            .tab_complete(sender, args)
    }

    /// Entry point for the host's entity-death event.
    pub fn on_entity_death(
        &self,
        event: &mut EntityDeathEvent,
        sink: &mut impl Broadcaster,
        rng: &mut impl Rng,
    ) {
        DeathHandler::new(&self.tables, &self.messages, &self.colorizer)
            .handle(event, sink, rng);
    }

    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
