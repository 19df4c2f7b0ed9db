//! ChatApp struct definition and initialization

use std::rc::Rc;

use crate::config::Settings;
use crate::socket::{ConnectParams, SocketChannel};
use crate::ui::theme::{apply_app_style, ChatTheme};
use crate::widget::{mount, ConnectionStatus, WidgetHandle};

pub struct ChatApp {
    pub(super) channel: Rc<SocketChannel>,
    pub(super) widget: WidgetHandle,
    pub(super) settings: Settings,
    /// `None` when the settings did not validate; the header then shows why.
    pub(super) params: Option<ConnectParams>,
    pub(super) theme: ChatTheme,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let theme = ChatTheme::from_name(&settings.theme);
        apply_app_style(&cc.egui_ctx, &theme);

        let channel = Rc::new(SocketChannel::spawn());
        let widget = mount(channel.clone(), settings.widget_options());

        let params = match settings.connect_params() {
            Ok(params) => Some(params),
            Err(e) => {
                log::error!("Invalid connection settings: {e}");
                widget.state_mut().status = ConnectionStatus::Failed(e.to_string());
                None
            }
        };

        let app = Self {
            channel,
            widget,
            settings,
            params,
            theme,
        };
        app.connect();
        app
    }

    /// Ask the backend to (re)connect with the current parameters.
    pub(super) fn connect(&self) {
        let Some(params) = self.params.clone() else {
            return;
        };
        match self.channel.connect(params) {
            Ok(()) => self.widget.state_mut().status = ConnectionStatus::Connecting,
            Err(e) => {
                log::error!("Backend unavailable: {e}");
                self.widget.state_mut().status = ConnectionStatus::Failed(e.to_string());
            }
        }
    }

    pub(super) fn room(&self) -> &str {
        self.params
            .as_ref()
            .map_or(self.settings.room.as_str(), |p| p.room.as_str())
    }

    pub(super) fn name(&self) -> &str {
        self.params
            .as_ref()
            .map_or(self.settings.name.as_str(), |p| p.name.as_str())
    }
}
