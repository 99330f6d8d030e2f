use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, post, put, web};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use rs_bayes_core::corpus::{load_corpus, train_documents};
use rs_bayes_core::io::{list_files, normalize_folder};
use rs_bayes_core::{BayesError, NaiveBayesModel, WordTokenizer};

/// Extension of corpus files served from the data directory.
const CORPUS_EXTENSION: &str = "tsv";

/// Server configuration, read from the environment.
///
/// - `RS_BAYES_HOST` (default `127.0.0.1`)
/// - `RS_BAYES_PORT` (default `5000`)
/// - `RS_BAYES_DATA_DIR` (default `./data`)
#[derive(Debug, Clone)]
struct ServerConfig {
	host: String,
	port: u16,
	data_dir: PathBuf,
}

impl ServerConfig {
	fn from_env() -> Result<Self, String> {
		let host = env::var("RS_BAYES_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
		let port = match env::var("RS_BAYES_PORT") {
			Ok(value) => value
				.parse::<u16>()
				.map_err(|_| format!("RS_BAYES_PORT must be a port number, got '{}'", value))?,
			Err(_) => 5000,
		};
		let data_dir = normalize_folder(&env::var("RS_BAYES_DATA_DIR").unwrap_or_else(|_| "./data".to_owned()));
		Ok(Self { host, port, data_dir })
	}
}

/// Body of the `/v1/train` endpoint
#[derive(Deserialize)]
struct TrainBody {
	category: String,
	text: String,
}

/// Body of the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictBody {
	text: String,
}

#[derive(Serialize)]
struct PredictResponse {
	category: String,
	scores: Vec<(String, f64)>,
	probabilities: Vec<(String, f64)>,
}

#[derive(Serialize)]
struct CategoryInfo {
	name: String,
	training_events: u64,
	distinct_words: usize,
}

#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>,
}

/// Model and tokenizer shared by every worker.
///
/// The whole struct sits behind a single `Mutex`: a training request and a
/// prediction request never observe each other half-way.
struct SharedData {
	model: NaiveBayesModel,
	tokenizer: WordTokenizer,
	data_dir: PathBuf,
}

/// HTTP PUT endpoint `/v1/train`
///
/// Learns one labeled document. Returns the number of tokens learned.
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: web::Json<TrainBody>) -> impl Responder {
	let category = body.category.trim();
	if category.is_empty() {
		return HttpResponse::BadRequest().body("Category cannot be empty");
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let SharedData { model, tokenizer, .. } = &mut *shared_data;
	let learned = model.train_text(&body.text, category, &*tokenizer);
	HttpResponse::Ok().body(learned.to_string())
}

/// HTTP POST endpoint `/v1/predict`
///
/// Classifies a text and returns the best category with all scores.
#[post("/v1/predict")]
async fn post_predict(data: web::Data<Mutex<SharedData>>, body: web::Json<PredictBody>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match shared_data.model.predict_text(&body.text, &shared_data.tokenizer) {
		Ok(prediction) => {
			let probabilities = prediction.probabilities();
			HttpResponse::Ok().json(PredictResponse {
				category: prediction.category,
				scores: prediction.scores,
				probabilities,
			})
		}
		Err(BayesError::EmptyModel) => HttpResponse::Conflict().body("Model has not been trained"),
		Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
	}
}

#[get("/v1/categories")]
async fn get_categories(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let model = &shared_data.model;
	let categories: Vec<CategoryInfo> = model
		.categories()
		.map(|name| CategoryInfo {
			name: name.to_owned(),
			training_events: model.category_count(name).unwrap_or(0),
			distinct_words: model.word_table(name).map(|table| table.len()).unwrap_or(0),
		})
		.collect();
	HttpResponse::Ok().json(categories)
}

#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	match list_files(&data_dir, CORPUS_EXTENSION) {
		Ok(files) => HttpResponse::Ok().body(corpus_names(&files).join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

/// Strips the corpus extension from listed file names.
fn corpus_names(files: &[String]) -> Vec<&str> {
	let suffix = format!(".{}", CORPUS_EXTENSION);
	files
		.iter()
		.map(|file| file.strip_suffix(suffix.as_str()).unwrap_or(file))
		.collect()
}

/// Returns `true` if `name` is a single plain file name (no separator, no `..`).
fn is_plain_corpus_name(name: &str) -> bool {
	!name.contains("..") && Path::new(name).file_name() == Some(OsStr::new(name))
}

/// HTTP PUT endpoint `/v1/load_corpus?names=a,b`
///
/// Trains the shared model on `<data_dir>/<name>.tsv` for every name.
/// All corpora are parsed before the model is locked for training.
#[put("/v1/load_corpus")]
async fn put_corpus(data: web::Data<Mutex<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let names: Vec<&str> = query_names.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
	if let Some(name) = names.iter().find(|name| !is_plain_corpus_name(name)) {
		return HttpResponse::BadRequest().body(format!("Invalid corpus name: {name}"));
	}

	let data_dir = match data.lock() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let mut documents = Vec::new();
	for name in names {
		let corpus_path = data_dir.join(format!("{}.{}", name, CORPUS_EXTENSION));
		match load_corpus(&corpus_path) {
			Ok(corpus) => documents.extend(corpus),
			Err(e) => {
				warn!("failed to load corpus '{}': {}", name, e);
				return HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}"));
			}
		}
	}

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let SharedData { model, tokenizer, .. } = &mut *shared_data;
	let learned = train_documents(model, &documents, &*tokenizer);
	info!("trained {} documents ({} tokens)", documents.len(), learned);

	HttpResponse::Ok().body(format!("Trained {} documents", documents.len()))
}

/// Main entry point for the server.
///
/// Reads the configuration, wraps an empty model in a `Mutex`
/// and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let config = ServerConfig::from_env().map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
	info!("starting on {}:{} (data: {})", config.host, config.port, config.data_dir.display());

	let shared_data = SharedData {
		model: NaiveBayesModel::new(),
		tokenizer: WordTokenizer::new(),
		data_dir: config.data_dir.clone(),
	};
	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(put_train)
			.service(post_predict)
			.service(get_categories)
			.service(get_corpora)
			.service(put_corpus)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
