//! Telegram transport: teloxide adapters and the long-polling loop.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{
    dispatching::{Dispatcher, UpdateFilterExt},
    dptree,
    error_handlers::LoggingErrorHandler,
    payloads::{DeleteWebhookSetters, SendMessageSetters},
    requests::Requester,
    types::{
        ButtonRequest, ChatId as TgChatId, KeyboardButton as TgKeyboardButton, KeyboardMarkup,
        Message, MessageId, Update,
    },
    Bot,
};
use tracing::{debug, info, instrument};
use weather_bot_core::{
    ChatId, ChatTransport, Coordinates, Credentials, InboundEvent, InboundKind, Keyboard,
    OpenWeatherClient, Router, SentMessage, WeatherSettings,
};

type BotRouter = Router<OpenWeatherClient, TelegramTransport>;

/// [`ChatTransport`] backed by the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<SentMessage> {
        let mut request = self.bot.send_message(TgChatId(chat.0), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard));
        }

        let sent = request
            .await
            .with_context(|| format!("Failed to send message to chat {chat}"))?;

        Ok(SentMessage { chat, id: sent.id.0 })
    }

    async fn delete(&self, message: SentMessage) -> Result<()> {
        self.bot
            .delete_message(TgChatId(message.chat.0), MessageId(message.id))
            .await
            .with_context(|| {
                format!("Failed to delete message {} in chat {}", message.id, message.chat)
            })?;
        Ok(())
    }
}

pub fn keyboard_markup(keyboard: &Keyboard) -> KeyboardMarkup {
    let rows = keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| {
                let button = TgKeyboardButton::new(b.caption.clone());
                if b.request_location {
                    button.request(ButtonRequest::Location)
                } else {
                    button
                }
            })
            .collect::<Vec<_>>()
    });

    KeyboardMarkup::new(rows).resize_keyboard()
}

/// Text and location messages become events; everything else is dropped.
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let kind = match msg.location() {
        Some(location) => InboundKind::Location(Coordinates {
            lat: location.latitude,
            lon: location.longitude,
        }),
        None => InboundKind::Text(msg.text()?.to_string()),
    };

    Some(InboundEvent { chat: ChatId(msg.chat.id.0), kind })
}

async fn on_message(msg: Message, router: Arc<BotRouter>) -> Result<()> {
    let Some(event) = inbound_event(&msg) else {
        debug!(chat_id = msg.chat.id.0, "skipping unsupported message kind");
        return Ok(());
    };

    router.handle(&event).await
}

/// Authenticate, drop updates queued while the bot was offline, then poll until ctrl-c.
///
/// The dispatcher handles updates of one chat in order and different chats concurrently.
#[instrument(skip_all)]
pub async fn run(credentials: Credentials, settings: &WeatherSettings) -> Result<()> {
    let bot = Bot::new(credentials.bot_token);

    let me = bot.get_me().await.context("Telegram rejected the bot token")?;
    info!(username = me.user.username.as_deref().unwrap_or("unknown"), "bot authenticated");

    bot.delete_webhook()
        .drop_pending_updates(true)
        .await
        .context("Failed to clear pending updates")?;
    info!("pending updates cleared");

    let provider = Arc::new(OpenWeatherClient::new(credentials.api_key, settings)?);
    let transport = Arc::new(TelegramTransport::new(bot.clone()));
    let router: Arc<BotRouter> = Arc::new(Router::new(provider, transport));

    let handler = Update::filter_message().endpoint(on_message);

    info!("starting long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![router])
        .default_handler(|upd| async move {
            debug!(update_id = upd.id.0, "unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error while handling message"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::ReplyMarkup;

    #[test]
    fn main_menu_markup_requests_location_once() {
        let markup = keyboard_markup(&Keyboard::main_menu());

        assert!(markup.resize_keyboard);
        assert_eq!(markup.keyboard.len(), 4);

        let requesting: Vec<_> = markup
            .keyboard
            .iter()
            .flatten()
            .filter(|b| matches!(b.request, Some(ButtonRequest::Location)))
            .collect();
        assert_eq!(requesting.len(), 1);
        assert_eq!(requesting[0].text, "📍 Mening joylashuvim");
    }

    #[test]
    fn cities_markup_keeps_layout() {
        let markup = keyboard_markup(&Keyboard::popular_cities());
        let captions: Vec<Vec<&str>> = markup
            .keyboard
            .iter()
            .map(|row| row.iter().map(|b| b.text.as_str()).collect())
            .collect();

        assert_eq!(captions[0], vec!["Toshkent", "Samarqand"]);
        assert_eq!(captions.last().unwrap(), &vec!["🔙 Orqaga"]);
        assert!(matches!(ReplyMarkup::from(markup), ReplyMarkup::Keyboard(_)));
    }
}
