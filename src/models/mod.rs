// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - users : Utilisateurs (ADMIN, JE = jeune entrepreneur, ES = entreprise solidaire)
//   - solidarity_company : Entreprises solidaires référencées sur la plateforme
//   - points_tier : Tranches de points configurées par l'admin ([min, max) en centimes)
//   - transaction : Transactions JE <-> ES (PENDING / VALIDATED / REJECTED)
//   - points_wallet : Portefeuille de points cumulés (un par JE)
//   - dto : Data Transfer Objects pour les requêtes/réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les montants sont stockés en centimes (entiers), jamais en décimal
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod users;
pub mod solidarity_company;
pub mod points_tier;
pub mod transaction;
pub mod points_wallet;
pub mod dto;
