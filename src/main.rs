use espupload::UploadError;

#[tokio::main]
async fn main() {
    if let Err(err) = espupload::cli::run().await {
        eprintln!("❌ {:#}", err);
        // A tool that ran and failed propagates its own exit code; everything
        // that failed before launch exits 1
        let code = err
            .downcast_ref::<UploadError>()
            .map_or(1, UploadError::exit_code);
        std::process::exit(code);
    }
}
