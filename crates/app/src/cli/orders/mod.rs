use clap::{Args, Subcommand};
use realty::access::{Actor, UserUuid};

mod list;
mod moderate;
mod show;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List orders, newest first
    List(list::ListOrdersArgs),
    /// Show an order with its lines
    Show(show::ShowOrderArgs),
    /// Complete a formed order, pricing it and dating delivery
    Approve(moderate::ModerateArgs),
    /// Turn a formed order down
    Reject(moderate::ModerateArgs),
    /// Discard a draft
    Delete(moderate::ModerateArgs),
}

/// Identity of the staff member running a command.
#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct ModeratorArgs {
    /// Moderator user UUID
    #[arg(long = "moderator", env = "REALTY_MODERATOR")]
    moderator_uuid: UserUuid,
}

impl ModeratorArgs {
    fn actor(self) -> Actor {
        Actor::Moderator(self.moderator_uuid)
    }
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::List(args) => list::run(args).await,
        OrdersSubcommand::Show(args) => show::run(args).await,
        OrdersSubcommand::Approve(args) => moderate::approve(args).await,
        OrdersSubcommand::Reject(args) => moderate::reject(args).await,
        OrdersSubcommand::Delete(args) => moderate::delete(args).await,
    }
}
