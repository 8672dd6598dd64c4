use std::time::Duration;

use serde::{Deserialize, Serialize};
use tsuna::{
    AuthContext, Config, Params, Request, Response, Server,
    auth::{ApiKey, Basic},
    body::ResBody,
    routing::{Controller, FsRepository, HandlerError, StaticFiles},
    server::ServerError,
};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    env_logger::init();

    let config = Config {
        server_name: Some("tsuna-example".into()),
        ..Config::bind(([0, 0, 0, 0], 3000))
    };
    let mut server = Server::new(config)?;

    let basic = Basic::new().with_realm("admin");
    basic.set("admin", "admin");

    let api_key = ApiKey::new().with_timeout(Duration::from_secs(3600));
    api_key.set("dev-key");

    let router = server.router_mut()?;
    router
        .get("/", index)?
        .get("/hello/{name}", hello)?
        .post("/echo", echo)?
        .get("/stream", stream)?;
    router.mount(Controller::new("/admin").with_auth(basic).get("/", admin))?;
    router.mount(Controller::new("/api").with_auth(api_key).get("/me", admin))?;
    router.mount(StaticFiles::new("/static", FsRepository::new("public")))?;

    server.start().await?;

    if let Err(err) = tokio::signal::ctrl_c().await {
        eprintln!("failed to listen for ctrl-c: {err}");
    }
    server.stop().await
}

async fn index(_: Request, _: Params, _: AuthContext) -> Response {
    Response::html("<h1>tsuna</h1>")
}

async fn hello(req: Request, params: Params, _: AuthContext) -> String {
    let greeting = req.query_param("greeting").unwrap_or("hello");
    format!("{greeting} {}", params.get("name").unwrap_or_default())
}

#[derive(Deserialize, Serialize)]
struct Message {
    text: String,
}

async fn echo(req: Request, _: Params, _: AuthContext) -> Result<Response, HandlerError> {
    let message: Message = req.json()?;
    Ok(Response::json(&message)?)
}

async fn stream(_: Request, _: Params, _: AuthContext) -> Response {
    let (tx, body) = ResBody::channel(4);
    tokio::spawn(async move {
        for i in 0..5 {
            if tx.send(format!("tick {i}\n")).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    });
    Response::new(body)
}

async fn admin(_: Request, _: Params, auth: AuthContext) -> String {
    format!("welcome {}", auth.principal().unwrap_or("anonymous"))
}
