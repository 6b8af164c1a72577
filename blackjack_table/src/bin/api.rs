use actix_web::{
    body::BoxBody,
    error, get,
    http::{header::ContentType, StatusCode},
    post, web, App, HttpResponse, HttpServer,
};
use blackjack_table::prelude::*;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Serve a single blackjack table over HTTP.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    address: String,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// JSON table configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Single deck game, shuffled fresh every round
    #[arg(long)]
    console: bool,
    #[arg(long)]
    seed: Option<u64>,
}

/// Body of a request to start a round. Missing fields fall back to the table's default bet and one hand.
#[derive(Debug, Deserialize)]
struct RoundRequest {
    bet: Option<u32>,
    hands: Option<HandCount>,
}

/// An enum that will handle user facing errors
#[derive(Debug)]
enum UserError {
    InternalError,
    Game(BlackjackGameError),
    NoAdvice(usize),
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::InternalError => write!(f, "an internal error occured"),
            UserError::Game(e) => write!(f, "{}", e),
            UserError::NoAdvice(index) => write!(f, "no advice for hand #{}", index),
        }
    }
}

impl std::error::Error for UserError {}

impl From<BlackjackGameError> for UserError {
    fn from(value: BlackjackGameError) -> Self {
        UserError::Game(value)
    }
}

impl error::ResponseError for UserError {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            UserError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            UserError::Game(BlackjackGameError::InvalidBet { .. }) => StatusCode::BAD_REQUEST,
            UserError::Game(BlackjackGameError::InactiveHand { .. }) => StatusCode::CONFLICT,
            UserError::Game(BlackjackGameError::InvalidShoeConfig { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            UserError::NoAdvice(_) => StatusCode::NOT_FOUND,
        }
    }
}

type AppGame = web::Data<Mutex<BlackjackGame>>;

/// Every request holds the lock for its whole turn, so actions on the table never interleave.
fn lock(app_game: &AppGame) -> Result<MutexGuard<'_, BlackjackGame>, UserError> {
    app_game.lock().map_err(|_| UserError::InternalError)
}

/// A handler that deals a new round, abandoning the open one if there is any.
#[post("/round")]
async fn start_round(
    params: web::Json<RoundRequest>,
    app_game: AppGame,
) -> Result<HttpResponse, UserError> {
    let mut game = lock(&app_game)?;
    let params = params.into_inner();
    let bet = params.bet.unwrap_or(game.config().default_bet);
    let snapshot = game.start_round(bet, params.hands.unwrap_or(HandCount::One))?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/hit/{hand}")]
async fn hit(path: web::Path<usize>, app_game: AppGame) -> Result<HttpResponse, UserError> {
    let mut game = lock(&app_game)?;
    let snapshot = game.hit(path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[post("/stand/{hand}")]
async fn stand(path: web::Path<usize>, app_game: AppGame) -> Result<HttpResponse, UserError> {
    let mut game = lock(&app_game)?;
    let snapshot = game.stand(path.into_inner())?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// A handler returning the advisor's recommendation for an active hand.
#[get("/advice/{hand}")]
async fn advice(path: web::Path<usize>, app_game: AppGame) -> Result<HttpResponse, UserError> {
    let index = path.into_inner();
    let game = lock(&app_game)?;
    match game.advice(index) {
        Some(advice) => Ok(HttpResponse::Ok().json(advice)),
        None => Err(UserError::NoAdvice(index)),
    }
}

#[get("/state")]
async fn state(app_game: AppGame) -> Result<HttpResponse, UserError> {
    let game = lock(&app_game)?;
    Ok(HttpResponse::Ok().json(game.snapshot()))
}

fn build_game(args: &Args) -> Result<BlackjackGame, SessionError> {
    let mut config = match (&args.config, args.console) {
        (Some(path), _) => TableConfig::from_json_file(path)?,
        (None, true) => TableConfig::console(),
        (None, false) => TableConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(BlackjackGame::new(config)?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let game = match build_game(&args) {
        Ok(game) => game,
        Err(e) => {
            warn!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    info!("listening at {}:{}...", args.address, args.port);

    let app_game: AppGame = web::Data::new(Mutex::new(game));

    HttpServer::new(move || {
        App::new()
            .app_data(app_game.clone())
            .service(start_round)
            .service(hit)
            .service(stand)
            .service(advice)
            .service(state)
    })
    .bind((args.address.as_str(), args.port))?
    .run()
    .await
}
