//! Widget interactions and host requests

/// Something the player did on a widget
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    /// Start button on the main menu
    Start,
    /// Open the settings panel
    OpenSettings,
    /// Open the leaderboard panel
    OpenLeaderboard,
    /// Open the exit confirmation panel
    OpenExit,
    /// Confirm leaving the application
    QuitApplication,
    /// Pause button during a run
    Pause,
    /// Resume button on the pause panel
    Resume,
    /// Restart button on the pause or game-over panel
    Restart,
    /// Quit button on the pause or game-over panel, back to the menu
    QuitToMenu,
    /// Support link
    Support,
    /// Music slider moved
    MusicVolume(f32),
    /// Effects slider moved
    EffectsVolume(f32),
}

/// Request the core makes of the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Open a web page
    OpenUrl(String),
    /// Exit the application
    Quit,
    /// Reload the current scene from scratch
    ReloadScene,
}

impl HostCommand {
    /// Forward this request to the host
    pub fn dispatch(&self, host: &mut dyn HostServices) {
        match self {
            Self::OpenUrl(url) => host.open_url(url),
            Self::Quit => host.quit(),
            Self::ReloadScene => host.reload_scene(),
        }
    }
}

/// Application-level services the host provides
pub trait HostServices {
    /// Open `url` in a browser
    fn open_url(&mut self, url: &str);

    /// Exit the application
    fn quit(&mut self);

    /// Reload the active scene
    fn reload_scene(&mut self);
}
