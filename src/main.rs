//! Local demo: two participants chatting over an in-memory signaling hub.

use std::sync::Arc;

use roomchat::{
    ChatConfig, ChatService, HubConnection, LocalParticipant, MenuControl, MenuType, MessageHistory, NotificationQueue,
    Observer, Session, SidenavMenu, SignalHub,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Participant {
    name: &'static str,
    connection: Arc<HubConnection>,
    chat: ChatService,
    profile: Arc<LocalParticipant>,
    menu: Arc<SidenavMenu>,
    notifications: Arc<NotificationQueue>,
}

impl Participant {
    fn join(hub: &SignalHub, name: &'static str, config: &ChatConfig) -> Self {
        let menu = Arc::new(SidenavMenu::new());
        let notifications = Arc::new(NotificationQueue::new());
        let profile = Arc::new(LocalParticipant::new(name));
        let connection = Arc::new(hub.connect());
        let chat = ChatService::with_config(
            connection.clone(),
            profile.clone(),
            menu.clone(),
            notifications.clone(),
            config.clone(),
        );
        chat.subscribe_to_chat();
        Self { name, connection, chat, profile, menu, notifications }
    }

    fn log_history(&self) {
        for m in self.chat.history().iter() {
            info!(participant = self.name, nickname = %m.nickname, is_local = m.is_local, message = %m.message, "history");
        }
    }
}

async fn wait_for_len(observer: &mut Observer<MessageHistory>, len: usize) {
    while let Some(history) = observer.recv().await {
        if history.len() >= len {
            return;
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChatConfig::from_env().expect("invalid chat config");
    let hub = SignalHub::new();
    let ann = Participant::join(&hub, "Ann", &config);
    let bob = Participant::join(&hub, "Bob", &config);
    info!(connections = hub.connection_count(), "hub: room ready");

    // Bob is already reading the chat; Ann is not.
    bob.menu.toggle_menu(MenuType::Chat);

    let mut ann_messages = ann.chat.messages();
    let mut bob_messages = bob.chat.messages();

    ann.chat.send_message("hello   everyone").expect("send failed");
    bob.profile.set_nickname("Bobby");
    bob.chat.send_message("hi  Ann").expect("send failed");
    ann.chat.send_message(" ").expect("send failed");

    wait_for_len(&mut ann_messages, 2).await;
    wait_for_len(&mut bob_messages, 2).await;

    for participant in [&ann, &bob] {
        info!(
            participant = participant.name,
            pending = participant.notifications.len(),
            panel_open = participant.menu.is_menu_opened(),
            "notifications"
        );
    }

    if let Some(options) = ann.notifications.act_on_latest() {
        info!(message = %options.message, opened = ?ann.menu.opened_menu(), "ann: opened chat from notification");
        ann.menu.close();
    }

    ann.log_history();
    bob.log_history();

    let ann_connection = ann.connection.connection_id().to_string();
    drop(ann);
    info!(
        connections = hub.connection_count(),
        ann_connected = hub.is_connected(&ann_connection),
        "hub: ann left"
    );
}
