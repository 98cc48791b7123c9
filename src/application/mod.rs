// Application layer - Use cases over the backend repository
pub mod alignment;
pub mod chart_projector;
pub mod dashboard_service;
pub mod ping_repository;
pub mod selection;
pub mod series_fetcher;
pub mod status_monitor;

#[cfg(test)]
pub mod stub_repository;
