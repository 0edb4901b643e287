/// Route modules
pub mod cards;
pub mod health;
pub mod transactions;
pub mod version;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health::healthz))
        .route("/readyz", web::get().to(health::readyz))
        .route("/version", web::get().to(version::version))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/credit-cards")
                        .route("", web::get().to(cards::list_credit_cards))
                        .route("", web::post().to(cards::create_credit_card))
                        .route("/is-distinct", web::post().to(cards::is_credit_card_distinct))
                        .route("/{id}", web::get().to(cards::get_credit_card))
                        .route("/{id}", web::put().to(cards::update_credit_card))
                        .route("/{id}", web::delete().to(cards::delete_credit_card))
                        .route("/{id}/valid", web::get().to(cards::is_credit_card_valid)),
                )
                .service(
                    web::scope("/transactions")
                        .route("", web::get().to(transactions::list_transactions))
                        .route("", web::post().to(transactions::create_transaction))
                        .route("/validate", web::post().to(transactions::validate_transaction))
                        .route("/fee", web::get().to(transactions::quote_fee))
                        .route("/{id}", web::get().to(transactions::get_transaction))
                        .route("/{id}", web::put().to(transactions::update_transaction))
                        .route("/{id}", web::delete().to(transactions::delete_transaction)),
                ),
        );
}
