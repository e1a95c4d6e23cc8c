use crate::{
    api::{document, leave_request, leave_type, profile, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leave")
                    // /leave
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leave/stats (before /{id})
                    .service(
                        web::resource("/stats")
                            .route(web::get().to(leave_request::leave_stats)),
                    )
                    // /leave/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leave/{id}/approve
                    .service(
                        web::resource("/{id}/approve")
                            .route(web::put().to(leave_request::approve_leave)),
                    )
                    // /leave/{id}/reject
                    .service(
                        web::resource("/{id}/reject")
                            .route(web::put().to(leave_request::reject_leave)),
                    )
                    // /leave/{id}/cancel
                    .service(
                        web::resource("/{id}/cancel")
                            .route(web::put().to(leave_request::cancel_leave)),
                    ),
            )
            .service(
                web::scope("/leave-types")
                    // /leave-types
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_type::list_leave_types))
                            .route(web::post().to(leave_type::create_leave_type)),
                    )
                    // /leave-types/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(leave_type::update_leave_type)),
                    ),
            )
            .service(
                web::scope("/profiles")
                    // /profiles
                    .service(web::resource("").route(web::get().to(profile::list_profiles)))
                    // /profiles/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(profile::get_profile))
                            .route(web::put().to(profile::update_profile))
                            .route(web::delete().to(profile::delete_profile)),
                    ),
            )
            .service(
                web::scope("/reports")
                    // /reports/leave.csv
                    .service(
                        web::resource("/leave.csv")
                            .route(web::get().to(report::export_leave_report)),
                    ),
            )
            .service(
                web::scope("/documents")
                    // Default payload limit is 256 KB; documents go up to 5 MB,
                    // plus a little headroom so the handler reports oversize
                    // files itself.
                    .app_data(web::PayloadConfig::new(
                        crate::domain::document::MAX_DOCUMENT_BYTES + 1024,
                    ))
                    // /documents
                    .service(
                        web::resource("").route(web::post().to(document::upload_document)),
                    ),
            ),
    );
}
