pub fn trace_init() {
    use tracing_subscriber::EnvFilter;
    let collector = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .without_time()
        .finish();
    let _ = tracing::subscriber::set_global_default(collector);
}
