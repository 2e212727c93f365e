use crate::{
    api::{attendance, employee},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

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

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/attendance")
                    // /attendance/score/{employee_id}
                    .service(
                        web::resource("/score/{employee_id}")
                            .wrap(build_limiter(config.rate_reports_per_min))
                            .route(web::get().to(attendance::monthly_score)),
                    )
                    // /attendance/team/day (team-wide fan-out, limited harder)
                    .service(
                        web::resource("/team/day")
                            .wrap(build_limiter(config.rate_team_per_min))
                            .route(web::get().to(attendance::team_day)),
                    )
                    // /attendance/team/month
                    .service(
                        web::resource("/team/month")
                            .wrap(build_limiter(config.rate_team_per_min))
                            .route(web::get().to(attendance::team_month)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .wrap(build_limiter(config.rate_reports_per_min))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .wrap(build_limiter(config.rate_reports_per_min))
                            .route(web::get().to(employee::get_employee)),
                    ),
            ),
    );
}
