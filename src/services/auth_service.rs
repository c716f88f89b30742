use crate::database::MongoDB;
use crate::models::{User, UserType};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub user_type: UserType,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
    pub aud: String, // audience
    pub iss: String, // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub user_type: UserType,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.user_id,
            email: user.email,
            user_type: user.user_type,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "curalink-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "curalink-api".to_string())
}

// Generate JWT token
pub fn generate_jwt(user: &User) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        user_type: user.user_type,
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    let filter = doc! {
        "email": &request.email,
    };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "Invalid email or password. Please try again.".to_string())?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| format!("Password verification error: {}", e))?;

    if !valid {
        return Err("Invalid email or password. Please try again.".to_string());
    }

    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user: user.into(),
    })
}

// User registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err("Please enter a valid email address.".to_string());
    }
    if request.password.len() < 6 {
        return Err("Password must be at least 6 characters.".to_string());
    }

    // Check if the email is already registered - possibly under the other role
    let filter = doc! { "email": &request.email };

    if let Some(existing) = collection
        .find_one(filter)
        .await
        .map_err(|e| format!("Database error: {}", e))?
    {
        if existing.user_type != request.user_type {
            return Err(format!(
                "This email is already registered as a {}. Please use a different email.",
                existing.user_type
            ));
        }
        return Err("This email is already in use. Please try logging in instead.".to_string());
    }

    let hashed_password =
        hash(&request.password, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {}", e))?;

    // Generate user_id
    let new_user_id = ObjectId::new().to_hex();

    let new_user = User {
        id: None,
        user_id: new_user_id.clone(),
        user_type: request.user_type,
        email: request.email.clone(),
        password: hashed_password,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        created_at: Some(BsonDateTime::now()),
        updated_at: Some(BsonDateTime::now()),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| format!("Failed to create user: {}", e))?;

    let token = generate_jwt(&new_user)?;

    log::info!(
        "✅ User registered successfully: {} ({})",
        new_user.email,
        new_user.user_type
    );

    Ok(AuthResponse {
        success: true,
        token,
        user: new_user.into(),
    })
}

// Get current user
pub async fn get_current_user(db: &MongoDB, user_id: &str) -> Result<UserInfo, String> {
    let collection = db.collection::<User>("users");

    let filter = doc! {
        "user_id": user_id,
    };

    let user = collection
        .find_one(filter)
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User not found".to_string())?;

    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(user_type: UserType) -> User {
        User {
            id: None,
            user_id: "user-1".to_string(),
            user_type,
            email: "jane@example.com".to_string(),
            password: "hashed".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_jwt_round_trip() {
        let user = test_user(UserType::Patient);
        let token = generate_jwt(&user).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.user_type, UserType::Patient);
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not-a-jwt").is_err());
    }
}
