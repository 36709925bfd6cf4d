use std::path::PathBuf;
use std::sync::Mutex;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use markov_gen_core::{GenError, GenerationInput, Predictor};

/// HTTP front-end for a shared Markov text predictor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Corpus to train on at startup; the model starts empty otherwise
	#[arg(short, long, value_name = "PATH")]
	corpus: Option<PathBuf>,

	/// Address to listen on
	#[arg(short, long, value_name = "ADDR", default_value = "127.0.0.1:5000")]
	bind: String,
}

/// Scanning a prompt registers its words, so every request
/// needs exclusive access to the predictor.
struct SharedData {
	predictor: Predictor
}

/// HTTP GET endpoint `/v1/generate`
///
/// Query parameters map onto `GenerationInput`: `prompt`, `length`, `seed`.
/// Returns the prompt followed by the generated continuation.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerationInput>) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.predictor.generate(&query.into_inner()) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(GenError::EmptyModel) => HttpResponse::BadRequest().body("Model is empty, train it first"),
		Err(e @ GenError::LengthTooLarge(_)) => HttpResponse::BadRequest().body(e.to_string()),
		Err(e) => {
			error!("generation failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

/// HTTP PUT endpoint `/v1/train`
///
/// Adds the request body to the model. Statistics accumulate across calls.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	shared_data.predictor.train(&body);
	HttpResponse::Ok().json(shared_data.predictor.summary())
}

#[get("/v1/summary")]
async fn get_summary(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().json(shared_data.predictor.summary())
}

fn configure(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated)
		.service(put_train)
		.service(get_summary);
}

/// Main entry point for the server.
///
/// Trains the predictor on the optional corpus, wraps it in a `Mutex`
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

	let predictor = match &args.corpus {
		Some(path) => Predictor::from_corpus_file(path)
			.with_context(|| format!("failed to train on {}", path.display()))?,
		None => Predictor::new(),
	};
	let shared_data = SharedData {
		predictor,
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	info!("listening on {}", args.bind);
	HttpServer::new(move || {
		App::new()
			.app_data(shared_model.clone())
			.configure(configure)
	})
		.bind(args.bind.as_str())?
		.run()
		.await?;

	Ok(())
}
