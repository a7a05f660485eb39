//! Demo accounts and accommodations for local development.

use tracing::info;
use uuid::Uuid;
use wayfare_core::password::hash_password;
use wayfare_core::repository::{AccommodationRepository, RepoError, RepoResult, UserRepository};
use wayfare_core::user::NewUser;
use wayfare_core::{Accommodation, Role, User};
use wayfare_shared::Masked;

pub const DEMO_PASSWORD: &str = "password";
pub const DEMO_ACCOMMODATION_ID: Uuid = Uuid::from_u128(0x2125be7b_f1f1_4f0a_af86_49c657870b5c);
pub const DEMO_MANAGER_ID: Uuid = Uuid::from_u128(0x5d3a4b7e_0c1f_4e55_9a4b_1f8f3c2d9e01);
pub const DEMO_USER_ID: Uuid = Uuid::from_u128(0x79ddfd3b_5c83_4beb_815e_55b1c95230e1);
pub const DEMO_USER_TWO_ID: Uuid = Uuid::from_u128(0x0b8e6f52_7a3d_4c19_8d2e_6a5b4c3d2e10);
pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0xa7c1d2e3_f4a5_4b6c_8d7e_9f0a1b2c3d4e);

struct DemoUser {
    id: Uuid,
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    role: Role,
    manager_id: Option<Uuid>,
}

const DEMO_USERS: [DemoUser; 4] = [
    DemoUser {
        id: DEMO_MANAGER_ID,
        first_name: "Demo",
        last_name: "Manager",
        email: "manager@demo.com",
        role: Role::Manager,
        manager_id: None,
    },
    DemoUser {
        id: DEMO_USER_ID,
        first_name: "Demo",
        last_name: "One",
        email: "demo1@demo.com",
        role: Role::Requester,
        manager_id: Some(DEMO_MANAGER_ID),
    },
    DemoUser {
        id: DEMO_USER_TWO_ID,
        first_name: "Demo",
        last_name: "Two",
        email: "demo2@demo.com",
        role: Role::Requester,
        manager_id: None,
    },
    DemoUser {
        id: DEMO_ADMIN_ID,
        first_name: "Demo",
        last_name: "Admin",
        email: "admin@demo.com",
        role: Role::Admin,
        manager_id: None,
    },
];

/// Idempotent: accounts whose e-mail already exists are left untouched.
pub async fn seed_demo_data(
    users: &dyn UserRepository,
    accommodations: &dyn AccommodationRepository,
) -> RepoResult<()> {
    accommodations
        .create_accommodation(&Accommodation::new(DEMO_ACCOMMODATION_ID, "Transcorp Hilton", "Abuja"))
        .await?;
    accommodations
        .create_accommodation(&Accommodation::new(
            Uuid::from_u128(0x3f6c2a1b_9d8e_4f7a_b6c5_d4e3f2a1b0c9),
            "Eko Hotel & Suites",
            "Lagos",
        ))
        .await?;

    for demo in DEMO_USERS.iter() {
        if users.find_by_email(demo.email).await?.is_some() {
            continue;
        }

        let hash = hash_password(DEMO_PASSWORD).map_err(|e| RepoError::Backend(e.to_string().into()))?;
        let mut user = User::new(
            NewUser {
                first_name: demo.first_name.to_string(),
                last_name: demo.last_name.to_string(),
                email: demo.email.to_string(),
                manager_id: demo.manager_id,
            },
            hash,
        );
        user.id = demo.id;
        user.role = demo.role;
        users.create_user(&user).await?;
        info!(email = %Masked(demo.email), role = %demo.role, "Seeded demo user");
    }

    Ok(())
}
