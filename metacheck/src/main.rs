use metacheck::commands::command_argument_builder;
use metacheck::handlers::handle_audit;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    handle_audit(&matches).await;
}
