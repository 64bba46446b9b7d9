mod models;
mod routes;
mod db;
mod services;
mod utils;
mod middleware;
use actix_web::{App, HttpServer, web};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    println!("🔌 Connecting to database...");
    let db = db::establish_connection()
        .await
        .expect("Failed to connect to database");
    println!("✅ Database connected!");

    let bind_addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    println!("🚀 Starting server on http://{}", bind_addr);

    // La connexion est enveloppée une seule fois dans web::Data (Arc) :
    // c'est le handle qui se clone pour chaque worker, pas la connexion
    let data = web::Data::new(db);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind_addr)?
        .run()
        .await
}
