//! Federated to local migration on login.

use kc_federation::{PromotionOutcome, SyncConfig};
use kc_model::CredentialInput;
use kc_storage_memory::FailPoint;

use crate::common::TestEnv;

/// First login of `f:123` copies alice, her password and her groups.
#[tokio::test]
async fn test_first_login_promotes_user() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.groups(&["admins", "dev"])?;
    let user = env.federated("f:123", "alice", "admins, dev")?;

    let outcome = env
        .login
        .on_login(&env.realm, &user, &CredentialInput::password("secret"))
        .await?;
    assert!(outcome.promoted());

    let local = env.local("alice").expect("local user created");
    let local_id = local.id.local_id().expect("local id");
    assert!(local.enabled);
    assert!(!local.is_federated());
    assert_eq!(local.email.as_deref(), Some("alice@example.com"));
    assert_eq!(local.first_name.as_deref(), Some("ALICE"));
    assert_eq!(local.last_name.as_deref(), Some("Federated"));

    let credentials = env.store.credentials(local_id);
    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0].value(), "secret");

    assert_eq!(env.store.group_names(env.realm.id, &local.id), vec!["admins", "dev"]);

    Ok(())
}

/// A local login is never promoted.
#[tokio::test]
async fn test_local_login_is_not_promoted() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let local = kc_model::Identity::local(env.realm.id, "root");
    env.store.insert_local(local.clone())?;

    let outcome = env
        .login
        .on_login(&env.realm, &local, &CredentialInput::password("pw"))
        .await?;

    assert_eq!(outcome.promotion, Some(PromotionOutcome::NotFederated));
    assert_eq!(env.store.local_users(env.realm.id).len(), 1);

    Ok(())
}

/// With the guard disabled a second promotion hits the store's uniqueness
/// constraint and fails the login instead of reporting success.
#[tokio::test]
async fn test_unguarded_repeat_promotion_fails() -> anyhow::Result<()> {
    let config = SyncConfig::builder()
        .guard_against_existing_local_user(false)
        .build();
    let env = TestEnv::with_config(&config)?;
    env.groups(&["dev"])?;
    let user = env.federated("f:9", "gina", "dev")?;
    let secret = CredentialInput::password("pw");

    assert!(env.login.on_login(&env.realm, &user, &secret).await?.promoted());

    let err = env
        .login
        .on_login(&env.realm, &user, &secret)
        .await
        .expect_err("duplicate promotion must fail");
    assert!(err.is_conflict());
    assert_eq!(env.store.local_users(env.realm.id).len(), 1);

    Ok(())
}

/// A store failure mid-promotion leaves no local user behind.
#[tokio::test]
async fn test_failed_promotion_leaves_no_user() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.groups(&["dev"])?;
    let user = env.federated("f:11", "hank", "dev")?;
    env.store.fail_next(FailPoint::InstallCredential);

    let result = env
        .login
        .on_login(&env.realm, &user, &CredentialInput::password("pw"))
        .await;
    assert!(result.is_err());
    assert!(env.local("hank").is_none());

    let retry = env
        .login
        .on_login(&env.realm, &user, &CredentialInput::password("pw"))
        .await?;
    assert!(retry.promoted());

    Ok(())
}
