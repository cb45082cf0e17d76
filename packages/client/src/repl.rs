//! Interactive session: reads commands, drives the use cases and prints every
//! pushed update of the room being watched.

use std::{io::Write, sync::Arc};

use omok_core::{
    domain::{GameError, GameStore, PlayerId, RoomId, RoomIdAllocator},
    infrastructure::{Subscription, SyncAdapter},
    usecase::{CreateGameUseCase, JoinGameUseCase, PlaceStoneUseCase, RestartGameUseCase},
};
use omok_shared::time::Clock;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, watch};

use crate::{command::Command, error::ClientError, formatter::GameFormatter};

/// Use cases wired against one store
pub struct GameClient {
    sync: Arc<SyncAdapter>,
    create: CreateGameUseCase,
    join: JoinGameUseCase,
    place: PlaceStoneUseCase,
    restart: RestartGameUseCase,
}

impl GameClient {
    pub fn new(store: Arc<dyn GameStore>, allocator: RoomIdAllocator, clock: Arc<dyn Clock>) -> Self {
        let sync = Arc::new(SyncAdapter::new(store));
        Self {
            create: CreateGameUseCase::new(sync.clone(), Arc::new(allocator), clock.clone()),
            join: JoinGameUseCase::new(sync.clone()),
            place: PlaceStoneUseCase::new(sync.clone()),
            restart: RestartGameUseCase::new(sync.clone(), clock),
            sync,
        }
    }
}

/// Result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(String),
    /// Nothing to print; the pushed update shows the result
    Silent,
    Quit,
}

/// State of one terminal: the acting identity and the watched room
pub struct ReplSession {
    client: GameClient,
    identity: watch::Sender<PlayerId>,
    room: Option<RoomId>,
    subscription: Option<Subscription>,
}

impl ReplSession {
    pub fn new(client: GameClient, player: PlayerId) -> Self {
        let (identity, _) = watch::channel(player);
        Self {
            client,
            identity,
            room: None,
            subscription: None,
        }
    }

    pub fn player(&self) -> PlayerId {
        self.identity.borrow().clone()
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    /// Watch the acting identity (used for the prompt)
    pub fn identity(&self) -> watch::Receiver<PlayerId> {
        self.identity.subscribe()
    }

    pub async fn handle(&mut self, command: Command) -> Result<Reply, ClientError> {
        match command {
            Command::As(name) => {
                let player = PlayerId::new(name)?;
                let reply = format!("Now acting as '{player}'");
                self.identity.send_replace(player);
                Ok(Reply::Message(reply))
            }
            Command::Create => {
                let room_id = self.client.create.execute(self.player()).await?;
                self.enter(room_id.clone()).await?;
                Ok(Reply::Message(format!(
                    "Created room {room_id}. Share the id with your opponent."
                )))
            }
            Command::Join(raw_room_id) => {
                let player = self.player();
                let stone = self.client.join.execute(&raw_room_id, &player).await?;
                let room_id = RoomId::new(raw_room_id.trim().to_string())?;
                self.enter(room_id.clone()).await?;
                Ok(Reply::Message(format!(
                    "Joined room {room_id} as {stone}"
                )))
            }
            Command::Place { row, col } => {
                let room_id = self.current_room()?;
                self.client
                    .place
                    .execute(&room_id, &self.player(), row, col)
                    .await?;
                Ok(Reply::Silent)
            }
            Command::Restart => {
                let room_id = self.current_room()?;
                self.client
                    .restart
                    .execute(&room_id, &self.player())
                    .await?;
                Ok(Reply::Silent)
            }
            Command::Show => {
                let room_id = self.current_room()?;
                let snapshot = self.client.sync.fetch(&room_id).await?;
                Ok(Reply::Message(GameFormatter::format_session(
                    &snapshot.session,
                    &self.player(),
                )))
            }
            Command::Leave => {
                let room_id = self.current_room()?;
                self.leave().await;
                Ok(Reply::Message(format!("Left room {room_id}")))
            }
            Command::Help => Ok(Reply::Message(Command::HELP.to_string())),
            Command::Quit => {
                self.leave().await;
                Ok(Reply::Quit)
            }
        }
    }

    fn current_room(&self) -> Result<RoomId, ClientError> {
        self.room.clone().ok_or(ClientError::NotInRoom)
    }

    /// Switch the watched room, printing every pushed update
    async fn enter(&mut self, room_id: RoomId) -> Result<(), ClientError> {
        if self.room.as_ref() == Some(&room_id) {
            return Ok(());
        }
        self.leave().await;

        let viewer = self.identity.subscribe();
        let subscription = self
            .client
            .sync
            .subscribe(&room_id, move |update: Result<_, GameError>| {
                let player = viewer.borrow().clone();
                match update {
                    Ok(session) => print!("{}", GameFormatter::format_session(&session, &player)),
                    Err(e) => print!("\n! {e}\n"),
                }
                redisplay_prompt(&player);
            })
            .await?;

        self.room = Some(room_id);
        self.subscription = Some(subscription);
        Ok(())
    }

    async fn leave(&mut self) {
        self.room = None;
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe().await;
        }
    }
}

/// Redisplay the prompt after asynchronous output
fn redisplay_prompt(player: &PlayerId) {
    print!("{player}> ");
    std::io::stdout().flush().ok();
}

/// Run the REPL until `quit` or end of input
pub async fn run_repl(mut session: ReplSession) -> Result<(), ClientError> {
    println!(
        "\nYou are '{}'. Type 'help' for commands. Press Ctrl+D to exit.\n",
        session.player()
    );

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let identity = session.identity();

    // rustyline blocks, so it gets its own thread
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("{}", ClientError::Readline(e.to_string()));
                return;
            }
        };

        loop {
            let prompt = format!("{}> ", *identity.borrow());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    while let Some(line) = input_rx.recv().await {
        let reply = match line.parse::<Command>() {
            Ok(command) => session.handle(command).await,
            Err(e) => Err(e),
        };
        match reply {
            Ok(Reply::Message(message)) => println!("{message}"),
            Ok(Reply::Silent) => {}
            Ok(Reply::Quit) => return Ok(()),
            Err(e) => {
                tracing::debug!("Command '{}' failed: {:?}", line, e);
                println!("error: {e}");
            }
        }
    }

    session.leave().await;
    Ok(())
}
