// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_bad_request() {
    let de = DomainError::validation("bad field");
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
}

#[test]
fn maps_conflicts_to_409() {
    let seat = DomainError::conflict(ConflictKind::SeatTaken, "seat taken");
    let app: AppError = seat.into();
    assert_eq!(app.code(), ErrorCode::UniqueViolation);
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(ConflictKind::Other("some conflict".to_string()), "generic conflict");
    let app: AppError = other.into();
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found_to_404() {
    let nf = DomainError::not_found(NotFoundKind::Session, "no such session");
    let app: AppError = nf.into();
    assert_eq!(app.code(), ErrorCode::SessionNotFound);
    assert_eq!(app.status().as_u16(), 404);
}

#[test]
fn maps_infra_db_unavailable() {
    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code(), ErrorCode::DbUnavailable);
    assert_eq!(app.status().as_u16(), 503);
}

#[test]
fn maps_infra_other_to_internal() {
    let other = DomainError::infra(InfraErrorKind::Other("unknown".to_string()), "other");
    let app: AppError = other.into();
    assert_eq!(app.code(), ErrorCode::Internal);
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn constructor_helpers() {
    let validation = DomainError::validation("invalid input");
    assert!(matches!(validation, DomainError::Validation(_)));

    let conflict = DomainError::conflict(ConflictKind::SeatTaken, "seat taken");
    assert!(matches!(conflict, DomainError::Conflict(ConflictKind::SeatTaken, _)));

    let not_found = DomainError::not_found(NotFoundKind::Session, "session missing");
    assert!(matches!(not_found, DomainError::NotFound(NotFoundKind::Session, _)));

    let infra = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    assert!(matches!(infra, DomainError::Infra(InfraErrorKind::Timeout, _)));
}
