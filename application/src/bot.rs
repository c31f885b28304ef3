//! [`Bot`] handling Discord gateway events.

use std::{fmt::Display, future::Future, sync::Arc};

use async_trait::async_trait;
use derive_more::Debug;
use serenity::{
    builder::{
        CreateCommand, CreateInteractionResponse,
        CreateInteractionResponseMessage,
    },
    client::{Context, EventHandler},
    model::{
        application::{Command, CommandInteraction, Interaction},
        gateway::Ready,
    },
};
use service::{query::TotalUsers, read::user::TotalCount, Query as _};
use tokio::sync::Notify;
use tracing as log;

use crate::Service;

/// Name of the slash command reporting the total count of directory users.
pub const TOTAL_USERS: &str = "totalusers";

/// Discord [`EventHandler`] exposing the [`Service`] to guild members.
#[derive(Debug)]
pub struct Bot {
    /// [`Service`] answering the slash commands.
    service: Service,

    /// Signalled once the gateway session is ready.
    #[debug(skip)]
    ready: Arc<Notify>,
}

impl Bot {
    /// Creates a new [`Bot`] signalling the provided [`Notify`] once the
    /// gateway session is ready.
    #[must_use]
    pub fn new(service: Service, ready: Arc<Notify>) -> Self {
        Self { service, ready }
    }

    /// Replies to the provided [`CommandInteraction`] with the provided
    /// `content`.
    async fn reply(
        ctx: &Context,
        interaction: &CommandInteraction,
        content: String,
    ) -> serenity::Result<()> {
        interaction
            .create_response(
                ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new().content(content),
                ),
            )
            .await
    }
}

#[async_trait]
impl EventHandler for Bot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        log::info!("connected to Discord as `{}`", ready.user.name);

        let command = CreateCommand::new(TOTAL_USERS)
            .description("Fetch the total number of users in the directory");
        match Command::create_global_command(&ctx, command).await {
            Ok(c) => log::info!("registered `/{}` command", c.name),
            Err(e) => {
                log::error!("failed to register `/{TOTAL_USERS}` command: {e}");
            }
        }

        self.ready.notify_one();
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(cmd) = interaction else {
            return;
        };
        if cmd.data.name != TOTAL_USERS {
            log::warn!("unknown `/{}` command invoked", cmd.data.name);
            return;
        }

        let total = self
            .service
            .execute(TotalUsers)
            .await
            .unwrap_or_else(|e| match e {});
        respond(total, |content| Self::reply(&ctx, &cmd, content)).await;
    }
}

/// Answers the [`TOTAL_USERS`] command with the provided [`TotalCount`]
/// via the provided `send` function.
///
/// If sending fails, the failure itself is sent once as the answer.
async fn respond<F, Fut, E>(total: TotalCount, send: F)
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let Err(e) = send(format!("Total users in the directory: {total}")).await
    else {
        return;
    };
    log::error!("failed to reply to `/{TOTAL_USERS}`: {e}");
    if let Err(e) = send(format!("Error: {e}")).await {
        log::error!("failed to report `/{TOTAL_USERS}` error: {e}");
    }
}
