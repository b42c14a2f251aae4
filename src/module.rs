//! The AATest host module.
//!
//! Ties one AA plugin instance to the host: loading by catalog name, the
//! schema-driven control surface, MIDI input and per-block audio.

use aatest_midi::{decode, velocity_to_unit, MidiInput, SysEx};
use aatest_plugin::{
    AudioIO, LoadStage, ModuleCatalog, ModuleConnector, PluginError, PluginHandle,
};
use serde::{Deserialize, Serialize};

use crate::binding::BindingSet;
use crate::builder::AaTestBuilder;
use crate::config::ModuleConfig;
use crate::dispatch::{ArityDispatcher, ChannelArity};
use crate::gui::{Canvas, ControlIdAllocator, UiDescriptor};
use crate::router::{ControlEvent, EventRouter, RouterAction};
use crate::surface::ControlSurface;
use crate::Result;

pub const DEFAULT_TITLE: &str = "aatest";

/// The only durable state of a module: what is loaded and where it plays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSaveData {
    pub aamodule: Option<String>,
    pub target: Option<String>,
}

impl ModuleSaveData {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

struct LoadedModule {
    name: String,
    plugin: Box<dyn PluginHandle>,
    io: AudioIO,
}

pub struct AaTest {
    config: ModuleConfig,
    connector: Box<dyn ModuleConnector>,
    catalog: ModuleCatalog,
    loaded: Option<LoadedModule>,
    router: EventRouter,
    dispatcher: ArityDispatcher,
    ids: ControlIdAllocator,
    enabled: bool,
    target: Option<String>,
    title: String,
    width: f32,
    height: f32,
    visible: bool,
    minimized: bool,
}

impl std::fmt::Debug for AaTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AaTest")
            .field("module", &self.module_name())
            .field("title", &self.title)
            .field("enabled", &self.enabled)
            .field("target", &self.target)
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}

impl AaTest {
    pub fn builder() -> AaTestBuilder {
        AaTestBuilder::default()
    }

    /// Default configuration.
    pub fn new(connector: Box<dyn ModuleConnector>) -> Self {
        Self::from_parts(ModuleConfig::default(), connector)
    }

    pub(crate) fn from_parts(config: ModuleConfig, connector: Box<dyn ModuleConnector>) -> Self {
        Self {
            catalog: ModuleCatalog::new(config.server_url.clone()),
            enabled: config.enabled,
            config,
            connector,
            loaded: None,
            router: EventRouter::default(),
            dispatcher: ArityDispatcher::new(),
            ids: ControlIdAllocator::new(),
            target: None,
            title: DEFAULT_TITLE.to_string(),
            width: 0.0,
            height: 0.0,
            visible: true,
            minimized: false,
        }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ModuleCatalog {
        &self.catalog
    }

    /// Module names offered by the plugin server. An unreachable server
    /// leaves the cached list (empty before the first successful scan).
    pub fn available_modules(&mut self, rescan: bool) -> Vec<String> {
        self.catalog
            .available_modules(self.connector.as_mut(), rescan)
    }

    /// Load the catalog module called `name`.
    ///
    /// Selecting the module that is already loaded does nothing. A name the
    /// catalog does not know (even after a rescan) leaves the current module
    /// in place; once the name resolves, the current instance is torn down
    /// before the new one is created.
    pub fn set_module(&mut self, name: &str) -> Result<()> {
        if self.module_name() == Some(name) {
            tracing::debug!("AA module '{}' already loaded", name);
            return Ok(());
        }

        if self.catalog.lookup(name).is_none() {
            if let Err(e) = self.catalog.rescan(self.connector.as_mut()) {
                tracing::error!("Cannot load AA module '{}': {}", name, e);
                return Err(e.into());
            }
        }
        let json_url = match self.catalog.lookup(name) {
            Some(entry) => entry.json_url.clone(),
            None => {
                tracing::warn!("No AA module named '{}' in the catalog", name);
                return Err(PluginError::UnknownModule(name.to_string()).into());
            }
        };

        self.unload();

        let Some(plugin) = self
            .connector
            .create(self.catalog.server_url(), &json_url)
        else {
            tracing::error!(
                "AA module '{}' could not be created from {}",
                name,
                json_url
            );
            return Err(PluginError::LoadFailed {
                module: name.to_string(),
                stage: LoadStage::Creation,
                reason: format!("runtime returned no module for {}", json_url),
            }
            .into());
        };

        self.install_plugin(name, plugin)
    }

    /// Load an already created plugin under `name`: init, arity, descriptor,
    /// control surface.
    ///
    /// A descriptor that fails to parse is returned as an error; the plugin
    /// stays loaded with no controls.
    pub fn install_plugin(&mut self, name: &str, mut plugin: Box<dyn PluginHandle>) -> Result<()> {
        self.unload();

        plugin.init(self.config.sample_rate);
        let io = plugin.audio_io();
        self.dispatcher.configure(io, self.config.block_size);
        let descriptor = plugin.gui_descriptor();

        self.loaded = Some(LoadedModule {
            name: name.to_string(),
            plugin,
            io,
        });
        self.title = name.to_string();
        tracing::info!("Loaded AA module '{}' ({})", name, io);

        let Some(json) = descriptor else {
            tracing::warn!("AA module '{}' has no GUI descriptor", name);
            return Ok(());
        };

        let surface = UiDescriptor::from_json(&json).and_then(|descriptor| {
            let surface = ControlSurface::build(&descriptor, &mut self.ids)?;
            Ok((descriptor, surface))
        });
        match surface {
            Ok((descriptor, surface)) => {
                self.title = descriptor.name;
                self.width = descriptor.width;
                self.height = descriptor.height;
                self.router = EventRouter::new(surface);
                Ok(())
            }
            Err(e) => {
                tracing::error!("AA module '{}' has an invalid GUI descriptor: {}", name, e);
                Err(e.into())
            }
        }
    }

    /// Destroy the plugin instance and every binding.
    pub fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            tracing::debug!("Unloading AA module '{}'", loaded.name);
        }
        self.router = EventRouter::default();
        self.dispatcher.reset();
        self.title = DEFAULT_TITLE.to_string();
        self.width = 0.0;
        self.height = 0.0;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn module_name(&self) -> Option<&str> {
        self.loaded.as_ref().map(|l| l.name.as_str())
    }

    pub fn audio_io(&self) -> Option<AudioIO> {
        self.loaded.as_ref().map(|l| l.io)
    }

    /// Compute path in use; `None` when unloaded or the arity is unsupported.
    pub fn arity(&self) -> Option<ChannelArity> {
        self.dispatcher.arity()
    }

    pub fn title_label(&self) -> &str {
        &self.title
    }

    /// `(width, height)` from the descriptor, `(0, 0)` without one.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn bindings(&self) -> &BindingSet {
        self.router.bindings()
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        self.minimized = minimized;
    }

    /// Render one block and add it into `outputs`.
    ///
    /// Does nothing while disabled, without a target, without a plugin, or
    /// when the plugin's arity is unsupported. Returns the number of frames
    /// rendered.
    pub fn process(&mut self, inputs: &[&[f32]], outputs: &mut [&mut [f32]]) -> usize {
        if !self.enabled || self.target.is_none() {
            return 0;
        }
        let Some(loaded) = self.loaded.as_mut() else {
            return 0;
        };
        let frames = outputs.iter().map(|out| out.len()).min().unwrap_or(0);
        if frames == 0 {
            return 0;
        }

        let Some(rendered) = self
            .dispatcher
            .compute(loaded.plugin.as_mut(), frames, inputs)
        else {
            return 0;
        };

        for (out, channel) in outputs.iter_mut().zip(rendered) {
            for (sample, value) in out.iter_mut().zip(channel) {
                *sample += *value;
            }
        }
        frames
    }

    /// Note input. Velocity 0 is a note-off.
    pub fn play_note(&mut self, pitch: u8, velocity: u8) {
        let Some(loaded) = self.loaded.as_mut() else {
            return;
        };
        if velocity > 0 {
            loaded.plugin.note_on(pitch, velocity_to_unit(velocity));
        } else {
            loaded.plugin.note_off(pitch, 0.0);
        }
    }

    /// Raw MIDI input: notes are played, transport SysEx fires triggers,
    /// anything else (including malformed bytes) is ignored.
    pub fn send_midi(&mut self, bytes: &[u8]) {
        match decode(bytes) {
            Ok(MidiInput::Note(note)) => self.play_note(note.pitch, note.velocity),
            Ok(MidiInput::SysEx(sysex)) => {
                self.handle_sysex(&sysex);
            }
            Ok(MidiInput::Other) => {}
            Err(e) => tracing::trace!("Ignoring MIDI input: {}", e),
        }
    }

    /// Fire transport triggers for a SysEx payload. Returns the number of
    /// parameter writes.
    pub fn handle_sysex(&mut self, sysex: &SysEx) -> usize {
        let actions = self.router.handle_sysex(sysex);
        self.apply(&actions)
    }

    /// Widget-changed callback from the host UI. Returns the number of
    /// parameter writes.
    pub fn control_changed(&mut self, event: ControlEvent) -> usize {
        let actions = self.router.control_changed(event);
        self.apply(&actions)
    }

    fn apply(&mut self, actions: &[RouterAction]) -> usize {
        match self.loaded.as_mut() {
            Some(loaded) => self.router.apply(actions, loaded.plugin.as_mut()),
            None => 0,
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if !self.visible || self.minimized {
            return;
        }
        self.router.bindings().draw(canvas);
    }

    pub fn save_data(&self) -> ModuleSaveData {
        ModuleSaveData {
            aamodule: self.module_name().map(str::to_string),
            target: self.target.clone(),
        }
    }

    /// Restore the target, then re-select the saved module (a no-op when it
    /// is already loaded).
    pub fn load_save_data(&mut self, data: &ModuleSaveData) -> Result<()> {
        self.target = data.target.clone();
        match &data.aamodule {
            Some(name) => self.set_module(name),
            None => Ok(()),
        }
    }
}
