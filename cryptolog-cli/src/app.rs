use crate::config::AppConfig;
use crate::errors::AppError;
use cryptolog_core::{Cryptolog, StreamStats};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{error, info, warn};

/// Run the pipeline over `reader`, writing to the configured destination.
///
/// Every startup step (salt, matcher, output file) completes before the
/// first line is read.
pub async fn run<R>(config: &AppConfig, reader: R) -> Result<StreamStats, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let cryptolog = Cryptolog::new(config.to_core_config())?;

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match config.outfile {
        Some(ref path) => {
            let file = tokio::fs::File::create(path)
                .await
                .map_err(|source| AppError::Output {
                    path: path.display().to_string(),
                    source,
                })?;
            info!("Writing anonymized log to {}", path.display());
            Box::new(BufWriter::new(file))
        }
        None => Box::new(tokio::io::stdout()),
    };

    run_with(&cryptolog, reader, writer).await
}

/// Race line processing against the salt rotation; a rotation failure
/// aborts the run because pseudonyms must not outlive their salt window.
///
/// Lines already anonymized are flushed to `writer` before the failure is
/// returned.
pub async fn run_with<R, W>(cryptolog: &Cryptolog, reader: R, mut writer: W) -> Result<StreamStats, AppError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut rotation = cryptolog.start_rotation()?;

    let result = tokio::select! {
        stats = cryptolog.processor().process(reader, &mut writer) => stats.map_err(AppError::from),
        rotated = rotation.wait() => {
            let err = match rotated {
                Err(e) => e,
                Ok(()) => cryptolog_core::CryptologError::RotationTask(
                    "salt rotation stopped unexpectedly".into(),
                ),
            };
            error!("Aborting: {}", err);
            if let Err(e) = writer.flush().await {
                warn!("Failed to flush output after abort: {}", e);
            }
            Err(AppError::from(err))
        }
    };

    rotation.stop();
    result
}
