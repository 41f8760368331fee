use crate::error::AppError;
use crate::models::UpdatePositionForm;
use crate::state::AppState;
use axum::{
    Form,
    body::{Body, Bytes},
    extract::{
        Path, State,
        rejection::{FormRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use fleet_state::TailReader;
use futures::stream;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use types::geo;
use types::ids::Vin;
use types::position::{PositionChunk, PositionRecord};

/// Chunks buffered between the stream task and the response body
const STREAM_BUFFER: usize = 16;

pub async fn update_position(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    form: Result<Form<UpdatePositionForm>, FormRejection>,
) -> Result<StatusCode, AppError> {
    // the server clock orders positions, not the client
    let timestamp = Utc::now();

    let vin = vin_from_path(&request_path(path)?)?;
    let Form(form) = form.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let (lat, lon) = form.coordinates()?;

    state
        .registry
        .write(&vin, PositionRecord::new(timestamp, lat, lon))
        .map_err(|err| {
            AppError::Stale(format!("could not write position for vin {:?}: {}", vin.as_str(), err))
        })?;

    Ok(StatusCode::CREATED)
}

pub async fn stream_position(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let path = request_path(path)?;
    if !is_stream_path(&path) {
        return Err(AppError::NotFound("not found".to_string()));
    }
    let vin = vin_from_path(&path)?;
    let reader = state.registry.open_reader(&vin)?;

    info!(vin = %vin, "Position stream opened");
    let (rx, _task) = spawn_position_stream(vin, reader);

    let body = Body::from_stream(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (Ok::<_, Infallible>(chunk), rx))
    }));

    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], body).into_response())
}

pub async fn not_found() -> AppError {
    AppError::NotFound("not found".to_string())
}

/// Start tailing `reader` in the background, one encoded chunk per record.
///
/// Dropping the returned receiver is the client's cancellation signal: a
/// watcher closes the reader so a task suspended in `read` wakes and exits.
fn spawn_position_stream(vin: Vin, reader: TailReader) -> (mpsc::Receiver<Bytes>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(STREAM_BUFFER);

    let disconnected = tx.clone();
    reader
        .closer()
        .close_when(async move { disconnected.closed().await });

    let task = tokio::spawn(stream_positions(reader, ChunkSink { vin, tx }));
    (rx, task)
}

async fn stream_positions(mut reader: TailReader, sink: ChunkSink) {
    let mut prev = match reader.read().await {
        Ok(record) => record,
        Err(err) => {
            sink.send(PositionChunk::failure(err.to_string())).await;
            return;
        }
    };

    loop {
        let chunk = match reader.read().await {
            Ok(record) => {
                let speed = geo::speed_kmh(&prev, &record);
                prev = record;
                PositionChunk::position(&record, speed)
            }
            Err(err) => {
                sink.send(PositionChunk::failure(err.to_string())).await;
                break;
            }
        };

        if !sink.send(chunk).await {
            break;
        }
    }

    debug!(vin = %sink.vin, "Position stream finished");
}

struct ChunkSink {
    vin: Vin,
    tx: mpsc::Sender<Bytes>,
}

impl ChunkSink {
    /// Returns false once the client has gone away.
    async fn send(&self, chunk: PositionChunk) -> bool {
        if self.tx.is_closed() {
            debug!(vin = %self.vin, "Client has gone, dropping stream");
            return false;
        }

        let line = match chunk.to_line() {
            Ok(line) => line,
            Err(err) => {
                // a single bad chunk must not kill a live tail
                error!(vin = %self.vin, error = %err, "Failed to encode position chunk");
                return true;
            }
        };

        self.tx.send(Bytes::from(line)).await.is_ok()
    }
}

/// Undecodable paths cannot name a vehicle.
fn request_path(path: Result<Path<String>, PathRejection>) -> Result<String, AppError> {
    path.map(|Path(path)| path)
        .map_err(|rejection| AppError::NotFound(format!("bad vin: {}", rejection.body_text())))
}

/// `{vin}/stream`, with anything allowed between the two.
fn is_stream_path(path: &str) -> bool {
    path == "stream" || path.ends_with("/stream")
}

/// Extract the VIN from the first segment of the lexically cleaned path.
///
/// Empty and `.` segments are skipped and `..` drops the segment before it,
/// so `the1vin/`, `/the1vin//stream` and `x/../the1vin` all name `THE1VIN`.
fn vin_from_path(path: &str) -> Result<Vin, AppError> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    Ok(Vin::parse(segments.first().copied().unwrap_or_default())?)
}
