//! Group sync across successive logins.

use kc_federation::SyncConfig;
use kc_model::CredentialInput;
use kc_storage_memory::StoreOperation;

use crate::common::TestEnv;

/// Memberships follow the roles attribute from one login to the next.
#[tokio::test]
async fn test_memberships_follow_attribute_changes() -> anyhow::Result<()> {
    let env = TestEnv::with_config(&SyncConfig::builder().promote_on_login(false).build())?;
    env.groups(&["admins", "dev", "ops"])?;
    let secret = CredentialInput::password("secret");

    let user = env.federated("f:42", "bob", "admins, dev")?;
    let first = env.login.on_login(&env.realm, &user, &secret).await?;
    let report = first.reconcile.expect("reconcile enabled");
    assert_eq!(report.joined, vec!["admins", "dev"]);

    env.store.clear_operations();
    let user = env.federated("f:42", "bob", "dev,ops")?;
    let second = env.login.on_login(&env.realm, &user, &secret).await?;
    let report = second.reconcile.expect("reconcile enabled");
    assert_eq!(report.left, vec!["admins"]);
    assert_eq!(report.joined, vec!["ops"]);

    assert_eq!(env.store.group_names(env.realm.id, &user.id), vec!["dev", "ops"]);
    assert!(env.store.local_users(env.realm.id).is_empty());
    let ops = env.store.operations();
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(StoreOperation::is_membership_change));

    Ok(())
}

/// Repeating a login with nothing changed issues no membership calls.
#[tokio::test]
async fn test_repeated_login_is_idempotent() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.groups(&["admins", "dev"])?;
    let secret = CredentialInput::password("secret");
    let user = env.federated("f:1", "carol", "dev, admins, dev")?;

    env.login.on_login(&env.realm, &user, &secret).await?;
    env.store.clear_operations();
    let outcome = env.login.on_login(&env.realm, &user, &secret).await?;

    assert!(outcome.reconcile.expect("reconcile enabled").is_noop());
    assert!(env.store.operations().is_empty());

    Ok(())
}

/// Unknown roles are skipped without failing the login.
#[tokio::test]
async fn test_unknown_roles_do_not_fail_login() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    env.groups(&["dev"])?;
    let user = env.federated("f:7", "erin", "ghost, dev, phantom")?;

    let outcome = env
        .login
        .on_login(&env.realm, &user, &CredentialInput::password("pw"))
        .await?;

    assert!(outcome.promoted());
    let report = outcome.reconcile.as_ref().expect("reconcile enabled");
    assert_eq!(report.joined, vec!["dev"]);

    Ok(())
}

/// Role groups can be scoped under a parent path.
#[tokio::test]
async fn test_groups_resolved_under_parent_path() -> anyhow::Result<()> {
    let config = SyncConfig::builder()
        .group_parent_path(kc_model::GroupPath::parse("/portal"))
        .build();
    let env = TestEnv::with_config(&config)?;
    env.groups(&["portal", "editors"])?;
    let nested = env.groups_at("/portal", &["editors"])?;
    let user = env.federated("f:3", "frank", "editors")?;

    env.login
        .on_login(&env.realm, &user, &CredentialInput::password("pw"))
        .await?;

    let local = env.local("frank").expect("promoted");
    let groups = kc_storage::MembershipProvider::current_groups(
        env.store.as_ref(),
        env.realm.id,
        &local.id,
    )
    .await?;
    assert_eq!(groups, nested);

    Ok(())
}
