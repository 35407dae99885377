//! API Routes
//!
//! HTTP endpoint definitions. Bodies are camelCase JSON.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BeneficiaryView, PendingUser, Profile, Role, TransactionView};
use crate::error::AppError;
use crate::handlers::{
    AddBeneficiaryCommand, AdminHandler, BeneficiaryHandler, HistoryHandler, LoginCommand,
    LoginHandler, ProfileHandler, RegisterCommand, RegisterHandler, TransferCommand,
    TransferHandler,
};

use super::middleware::{AdminUser, ApiJson, ApiPath, AuthUser};
use super::state::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub mobile: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub balance: Decimal,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveUserRequest {
    pub balance: Decimal,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminActionResponse {
    pub message: String,
    pub user: PendingUser,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBeneficiaryRequest {
    pub account_identifier: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBeneficiaryResponse {
    #[serde(flatten)]
    pub beneficiary: BeneficiaryView,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub sender_user_id: Uuid,
    pub beneficiary_id: Uuid,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub transaction_id: Uuid,
    pub message: String,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Authentication
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user/:id", get(get_profile))
        // Administration
        .route("/admin/pending-users", get(list_pending_users))
        .route("/admin/approve-user/:id", post(approve_user))
        .route("/admin/reject-user/:id", post(reject_user))
        // Beneficiaries (GET takes the owner id, DELETE the beneficiary id)
        .route("/beneficiaries", post(add_beneficiary))
        .route(
            "/beneficiaries/:id",
            get(list_beneficiaries).delete(remove_beneficiary),
        )
        // Transactions
        .route("/transactions/history", get(history))
        .route("/transactions/transfer", post(transfer))
}

// =========================================================================
// POST /register, POST /login, GET /user/:id
// =========================================================================

async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let command = RegisterCommand::new(
        request.name,
        request.email,
        request.password,
        request.mobile,
    );
    let result = RegisterHandler::new(state.store).execute(command).await?;

    Ok(Json(RegisterResponse {
        user_id: result.user_id,
        message: "Registration successful. Awaiting admin approval.".to_string(),
    }))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let result = LoginHandler::new(state.store, state.jwt)
        .execute(LoginCommand::new(request.email, request.password))
        .await?;

    Ok(Json(LoginResponse {
        token: result.token,
        user_id: result.profile.user_id,
        name: result.profile.name,
        email: result.profile.email,
        balance: result.profile.balance,
        role: result.role,
    }))
}

async fn get_profile(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, AppError> {
    let profile = ProfileHandler::new(state.store)
        .execute(&identity, user_id)
        .await?;
    Ok(Json(profile))
}

// =========================================================================
// Admin endpoints
// =========================================================================

async fn list_pending_users(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
) -> Result<Json<Vec<PendingUser>>, AppError> {
    let users = AdminHandler::new(state.store).list_pending(&identity).await?;
    Ok(Json(users))
}

async fn approve_user(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<ApproveUserRequest>,
) -> Result<Json<AdminActionResponse>, AppError> {
    let user = AdminHandler::new(state.store)
        .approve(&identity, user_id, request.balance)
        .await?;

    Ok(Json(AdminActionResponse {
        message: format!("User {} approved with balance {:.2}", user.name, user.balance),
        user: PendingUser::from(&user),
    }))
}

async fn reject_user(
    State(state): State<AppState>,
    AdminUser(identity): AdminUser,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<AdminActionResponse>, AppError> {
    let user = AdminHandler::new(state.store)
        .reject(&identity, user_id)
        .await?;

    Ok(Json(AdminActionResponse {
        message: format!("User {} rejected and removed", user.name),
        user: PendingUser::from(&user),
    }))
}

// =========================================================================
// Beneficiary endpoints
// =========================================================================

async fn list_beneficiaries(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(owner_id): ApiPath<Uuid>,
) -> Result<Json<Vec<BeneficiaryView>>, AppError> {
    let list = BeneficiaryHandler::new(state.store)
        .list(&identity, owner_id)
        .await?;
    Ok(Json(list))
}

async fn add_beneficiary(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<AddBeneficiaryRequest>,
) -> Result<(StatusCode, Json<AddBeneficiaryResponse>), AppError> {
    let command = AddBeneficiaryCommand::new(identity.user_id, request.account_identifier);
    let beneficiary = BeneficiaryHandler::new(state.store)
        .add(&identity, command)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddBeneficiaryResponse {
            beneficiary,
            message: "Beneficiary added successfully".to_string(),
        }),
    ))
}

async fn remove_beneficiary(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiPath(beneficiary_id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    BeneficiaryHandler::new(state.store)
        .remove(&identity, beneficiary_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Beneficiary removed".to_string(),
    }))
}

// =========================================================================
// Transaction endpoints
// =========================================================================

async fn history(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<TransactionView>>, AppError> {
    let views = HistoryHandler::new(state.store).execute(&identity).await?;
    Ok(Json(views))
}

async fn transfer(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<TransferResponse>, AppError> {
    let command = TransferCommand::new(request.sender_user_id, request.beneficiary_id, request.amount);
    let command = if let Some(description) = request.description {
        command.with_description(description)
    } else {
        command
    };

    let result = TransferHandler::new(state.store)
        .execute(command, &identity)
        .await?;

    Ok(Json(TransferResponse {
        transaction_id: result.transaction_id,
        message: "Transfer successful.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_transfer_request_deserialize() {
        let json = r#"{
            "senderUserId": "550e8400-e29b-41d4-a716-446655440001",
            "beneficiaryId": "550e8400-e29b-41d4-a716-446655440002",
            "amount": 100.50,
            "description": "Rent"
        }"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, dec!(100.50));
        assert_eq!(request.description, Some("Rent".to_string()));
    }

    #[test]
    fn test_transfer_request_amount_as_string() {
        let json = r#"{
            "senderUserId": "550e8400-e29b-41d4-a716-446655440001",
            "beneficiaryId": "550e8400-e29b-41d4-a716-446655440002",
            "amount": "1500"
        }"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.amount, dec!(1500));
        assert!(request.description.is_none());
    }

    #[test]
    fn test_add_beneficiary_response_is_flat() {
        let response = AddBeneficiaryResponse {
            beneficiary: BeneficiaryView {
                beneficiary_id: Uuid::nil(),
                beneficiary_user_id: Uuid::nil(),
                name: "Bob".to_string(),
                account_identifier: "bob@example.com".to_string(),
                date_added: chrono::Utc::now(),
            },
            message: "ok".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accountIdentifier"], "bob@example.com");
        assert_eq!(json["message"], "ok");
    }
}
