pub mod analytics_service;
pub mod checkout_service;
pub mod payment_intent_service;
pub mod token_service;
pub mod user_service;

pub use payment_intent_service::{PaymentIntentProvider, StripeClient, UnconfiguredProvider};
pub use token_service::{Claims, IdentityClaims, TokenService};
