use sea_orm::*;
use sea_orm::sea_query::Expr;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::dto::CreateTransactionRequest;
use crate::models::transaction::{self, TransactionStatus};
use crate::models::{points_tier, points_wallet, solidarity_company, users};
use crate::services::error::ServiceError;
use crate::services::points_service::PointsService;

pub struct TransactionService;

/// Résumé renvoyé après approbation ou rejet d'une transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSummary {
    pub id: Uuid,
    pub status: TransactionStatus,
    pub points_earned: i32,
    pub validated_at: Option<DateTime<Utc>>,
}

impl TransactionService {
    /// Crée une transaction PENDING pour un JE envers une entreprise vérifiée
    pub async fn create_transaction(
        db: &DatabaseConnection,
        je_user_id: Uuid,
        request: CreateTransactionRequest,
    ) -> Result<transaction::Model, ServiceError> {
        let user = users::Entity::find_by_id(je_user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", je_user_id))?;

        if !user.is_je() {
            return Err(ServiceError::validation(
                "Only Young Entrepreneurs can create transactions",
            ));
        }

        let company = solidarity_company::Entity::find_by_id(request.solidarity_company_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::not_found("SolidarityCompany", request.solidarity_company_id)
            })?;

        if !company.is_verified {
            return Err(ServiceError::validation(
                "Can only transact with verified companies",
            ));
        }

        if request.amount_cents <= 0 {
            return Err(ServiceError::validation(
                "Transaction amount must be positive",
            ));
        }

        let now = Utc::now();
        let new_transaction = transaction::ActiveModel {
            id: Set(Uuid::new_v4()),
            je_user_id: Set(je_user_id),
            solidarity_company_id: Set(request.solidarity_company_id),
            amount_cents: Set(request.amount_cents),
            description: Set(request.description),
            status: Set(TransactionStatus::Pending),
            points_earned: Set(0),
            validated_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(new_transaction.insert(db).await?)
    }

    /// Approuve ou rejette une transaction PENDING.
    ///
    /// Approbation : calcule les points via les tranches actives, passe la
    /// transaction en VALIDATED et crédite le portefeuille du JE.
    /// Rejet : passe en REJECTED, points à 0, portefeuille intact.
    ///
    /// Transition de statut, calcul des points et crédit du portefeuille
    /// forment une seule unité de travail : tout s'exécute dans une
    /// transaction base de données, et la transition elle-même est un UPDATE
    /// conditionnel gardé par le statut PENDING. Deux approbations
    /// concurrentes ne peuvent donc pas créditer deux fois.
    pub async fn validate_transaction(
        db: &DatabaseConnection,
        approver_user_id: Uuid,
        transaction_id: Uuid,
        approve: bool,
    ) -> Result<ValidationSummary, ServiceError> {
        let approver = users::Entity::find_by_id(approver_user_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", approver_user_id))?;

        if !approver.is_es() && !approver.is_admin() {
            return Err(ServiceError::Unauthorized(
                "Only ES representatives or admins can validate transactions".to_string(),
            ));
        }

        let summary = db
            .transaction::<_, ValidationSummary, ServiceError>(|txn| {
                Box::pin(async move {
                    let pending = transaction::Entity::find_by_id(transaction_id)
                        .one(txn)
                        .await?
                        .ok_or_else(|| ServiceError::not_found("Transaction", transaction_id))?;

                    if !pending.is_pending() {
                        return Err(ServiceError::Conflict(
                            "Transaction has already been processed".to_string(),
                        ));
                    }

                    let (new_status, points_earned) = if approve {
                        let tiers = points_tier::Entity::find()
                            .filter(points_tier::Column::IsActive.eq(true))
                            .all(txn)
                            .await?;

                        let points = PointsService::calculate_points(pending.amount_cents, &tiers);
                        (TransactionStatus::Validated, points)
                    } else {
                        (TransactionStatus::Rejected, 0)
                    };

                    // Transition conditionnelle gardée par le statut PENDING :
                    // une requête concurrente déjà passée laisse rows_affected à 0
                    let now = Utc::now();
                    let updated = transaction::Entity::update_many()
                        .col_expr(transaction::Column::Status, Expr::value(new_status.clone()))
                        .col_expr(transaction::Column::PointsEarned, Expr::value(points_earned))
                        .col_expr(transaction::Column::ValidatedAt, Expr::value(Some(now)))
                        .col_expr(transaction::Column::UpdatedAt, Expr::value(now))
                        .filter(transaction::Column::Id.eq(transaction_id))
                        .filter(transaction::Column::Status.eq(TransactionStatus::Pending))
                        .exec(txn)
                        .await?;

                    if updated.rows_affected == 0 {
                        return Err(ServiceError::Conflict(
                            "Transaction has already been processed".to_string(),
                        ));
                    }

                    if approve {
                        Self::credit_wallet(txn, pending.je_user_id, points_earned).await?;
                    }

                    Ok(ValidationSummary {
                        id: transaction_id,
                        status: new_status,
                        points_earned,
                        validated_at: Some(now),
                    })
                })
            })
            .await?;

        Ok(summary)
    }

    /// Crédite le portefeuille du JE. L'incrément est un UPDATE atomique
    /// (total_points = total_points + n) ; si aucune ligne n'existe encore,
    /// le portefeuille est créé avec ce solde, même pour 0 point. L'index
    /// unique sur user_id sert de garde-fou aux créations concurrentes.
    async fn credit_wallet(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        points: i32,
    ) -> Result<(), ServiceError> {
        let now = Utc::now();

        let updated = points_wallet::Entity::update_many()
            .col_expr(
                points_wallet::Column::TotalPoints,
                Expr::col(points_wallet::Column::TotalPoints).add(points as i64),
            )
            .col_expr(points_wallet::Column::UpdatedAt, Expr::value(now))
            .filter(points_wallet::Column::UserId.eq(user_id))
            .exec(txn)
            .await?;

        if updated.rows_affected == 0 {
            let wallet = points_wallet::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                total_points: Set(points as i64),
                created_at: Set(now),
                updated_at: Set(now),
            };
            wallet.insert(txn).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn user(role: UserRole) -> users::Model {
        let now = Utc::now();
        users::Model {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    fn pending_transaction(amount_cents: i64) -> transaction::Model {
        let now = Utc::now();
        transaction::Model {
            id: Uuid::new_v4(),
            je_user_id: Uuid::new_v4(),
            solidarity_company_id: Uuid::new_v4(),
            amount_cents,
            description: None,
            status: TransactionStatus::Pending,
            points_earned: 0,
            validated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn tier(min: i64, max: Option<i64>, points: i32) -> points_tier::Model {
        let now = Utc::now();
        points_tier::Model {
            id: Uuid::new_v4(),
            min_amount_cents: min,
            max_amount_cents: max,
            points_awarded: points,
            label: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn wallet(user_id: Uuid, total_points: i64) -> points_wallet::Model {
        let now = Utc::now();
        points_wallet::Model {
            id: Uuid::new_v4(),
            user_id,
            total_points,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_approve_credits_wallet_from_matching_tier() {
        let approver = user(UserRole::Es);
        let pending = pending_transaction(15000);

        // Tranches A = [0, 10000) -> 1 point, B = [10000, +inf) -> 2 points
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![tier(0, Some(10000), 1), tier(10000, None, 2)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }]) // transition VALIDATED
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }]) // pas encore de portefeuille
            .append_query_results([vec![wallet(pending.je_user_id, 2)]]) // création du portefeuille
            .into_connection();

        let summary =
            TransactionService::validate_transaction(&db, approver.id, pending.id, true)
                .await
                .unwrap();

        assert_eq!(summary.id, pending.id);
        assert_eq!(summary.status, TransactionStatus::Validated);
        assert_eq!(summary.points_earned, 2);
        assert!(summary.validated_at.is_some());
    }

    #[tokio::test]
    async fn test_approve_with_existing_wallet_increments_in_place() {
        let approver = user(UserRole::Admin);
        let pending = pending_transaction(500);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![tier(0, Some(10000), 1)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }]) // transition
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }]) // incrément du portefeuille
            .into_connection();

        let summary =
            TransactionService::validate_transaction(&db, approver.id, pending.id, true)
                .await
                .unwrap();

        assert_eq!(summary.points_earned, 1);
    }

    #[tokio::test]
    async fn test_approve_without_tiers_still_creates_wallet_at_zero() {
        let approver = user(UserRole::Es);
        let pending = pending_transaction(15000);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![pending.clone()]])
            .append_query_results([Vec::<points_tier::Model>::new()]) // aucune tranche active
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .append_query_results([vec![wallet(pending.je_user_id, 0)]])
            .into_connection();

        let summary =
            TransactionService::validate_transaction(&db, approver.id, pending.id, true)
                .await
                .unwrap();

        assert_eq!(summary.status, TransactionStatus::Validated);
        assert_eq!(summary.points_earned, 0);
    }

    #[tokio::test]
    async fn test_reject_sets_rejected_and_leaves_wallet_alone() {
        let approver = user(UserRole::Es);
        let pending = pending_transaction(15000);

        // Pas de lecture des tranches ni d'accès portefeuille sur le rejet
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![pending.clone()]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 1 }])
            .into_connection();

        let summary =
            TransactionService::validate_transaction(&db, approver.id, pending.id, false)
                .await
                .unwrap();

        assert_eq!(summary.status, TransactionStatus::Rejected);
        assert_eq!(summary.points_earned, 0);
        assert!(summary.validated_at.is_some());
    }

    #[tokio::test]
    async fn test_already_processed_transaction_is_a_conflict() {
        let approver = user(UserRole::Admin);
        let mut processed = pending_transaction(15000);
        processed.status = TransactionStatus::Validated;
        processed.points_earned = 2;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![processed.clone()]])
            .into_connection();

        let err = TransactionService::validate_transaction(&db, approver.id, processed.id, true)
            .await
            .unwrap_err();

        match err {
            ServiceError::Conflict(message) => {
                assert_eq!(message, "Transaction has already been processed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_concurrent_transition_loses_on_conditional_update() {
        // La lecture voit encore PENDING mais l'UPDATE conditionnel ne touche
        // aucune ligne : une requête concurrente est passée entre-temps
        let approver = user(UserRole::Es);
        let pending = pending_transaction(2000);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![tier(0, None, 1)]])
            .append_exec_results([MockExecResult { last_insert_id: 0, rows_affected: 0 }])
            .into_connection();

        let err = TransactionService::validate_transaction(&db, approver.id, pending.id, true)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_je_cannot_validate_transactions() {
        let approver = user(UserRole::Je);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .into_connection();

        let err =
            TransactionService::validate_transaction(&db, approver.id, Uuid::new_v4(), true)
                .await
                .unwrap_err();

        match err {
            ServiceError::Unauthorized(message) => {
                assert_eq!(
                    message,
                    "Only ES representatives or admins can validate transactions"
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_approver_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let err =
            TransactionService::validate_transaction(&db, Uuid::new_v4(), Uuid::new_v4(), true)
                .await
                .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { entity: "User", .. }));
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found() {
        let approver = user(UserRole::Es);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![approver.clone()]])
            .append_query_results([Vec::<transaction::Model>::new()])
            .into_connection();

        let err =
            TransactionService::validate_transaction(&db, approver.id, Uuid::new_v4(), true)
                .await
                .unwrap_err();

        assert!(matches!(err, ServiceError::NotFound { entity: "Transaction", .. }));
    }

    #[tokio::test]
    async fn test_create_transaction_requires_je_role() {
        let es_user = user(UserRole::Es);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![es_user.clone()]])
            .into_connection();

        let request = CreateTransactionRequest {
            solidarity_company_id: Uuid::new_v4(),
            amount_cents: 1000,
            description: None,
        };

        let err = TransactionService::create_transaction(&db, es_user.id, request)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_transaction_rejects_unverified_company() {
        let je_user = user(UserRole::Je);
        let now = Utc::now();
        let company = solidarity_company::Model {
            id: Uuid::new_v4(),
            name: "Coopérative du Coin".to_string(),
            description: None,
            is_verified: false,
            created_at: now,
            updated_at: now,
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![je_user.clone()]])
            .append_query_results([vec![company.clone()]])
            .into_connection();

        let request = CreateTransactionRequest {
            solidarity_company_id: company.id,
            amount_cents: 1000,
            description: None,
        };

        let err = TransactionService::create_transaction(&db, je_user.id, request)
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(message) => {
                assert_eq!(message, "Can only transact with verified companies");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
