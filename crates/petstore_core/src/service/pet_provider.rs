//! Pet provider: validation, address routing and change notification.
//!
//! # Responsibility
//! - Resolve addresses to record-store filters.
//! - Validate insert and update payloads before any write.
//! - Notify observers after mutations that changed rows.
//!
//! # Invariants
//! - No write happens when validation fails.
//! - Observers are notified iff a mutation affected at least one row,
//!   for both address shapes.
//! - Only metadata (ids, counts, error codes) is logged, never field values.

use crate::config::StoreConfig;
use crate::contract::{Address, AddressMatcher, Column, ResolvedAddress, ResourceKind};
use crate::model::pet::{InsertCheck, NewPet, PetValues};
use crate::repo::pet_repo::{Filter, PetQuery, PetRepository, PetRows, SortOrder};
use crate::service::error::{ProviderError, ProviderResult, UsageError};
use crate::service::notify::{ChangeEvent, ChangeKind, ChangeNotifier, ChangeObserver, ObserverId};
use log::{error, info, warn};
use std::sync::Arc;

/// Outcome of update payload checks that did not abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateCheck {
    /// No fields supplied; report 0 rows without touching the store.
    NoOp,
    /// A supplied field is invalid; report 0 rows without touching the store.
    Rejected,
    /// Payload may be written.
    Apply,
}

/// Checks an insert payload and fills defaults.
///
/// # Errors
/// - `Validation(EmptyName)` when name is absent or empty.
/// - `Validation(NonPositiveWeight)` when a supplied weight is zero or negative.
/// - `Usage(MissingGender)` when gender is absent.
pub fn validate_for_insert(values: &PetValues) -> ProviderResult<NewPet> {
    match NewPet::try_from_values(values) {
        InsertCheck::Valid(pet) => Ok(pet),
        InsertCheck::Invalid(err) => Err(ProviderError::Validation(err)),
        InsertCheck::MissingGender => Err(ProviderError::Usage(UsageError::MissingGender)),
    }
}

/// Checks an update payload.
///
/// A supplied empty name aborts with `EmptyNameOnUpdate`; a supplied
/// non-positive weight rejects the whole update softly.
pub fn validate_for_update(values: &PetValues) -> Result<UpdateCheck, UsageError> {
    if values.is_empty() {
        return Ok(UpdateCheck::NoOp);
    }

    if values.name.as_deref().is_some_and(str::is_empty) {
        return Err(UsageError::EmptyNameOnUpdate);
    }

    if values.weight.is_some_and(|weight| weight <= 0) {
        return Ok(UpdateCheck::Rejected);
    }

    Ok(UpdateCheck::Apply)
}

/// Access mediator over a pet repository.
pub struct PetProvider<'cfg, R: PetRepository> {
    config: &'cfg StoreConfig,
    matcher: AddressMatcher,
    repo: R,
    notifier: ChangeNotifier,
}

impl<'cfg, R: PetRepository> PetProvider<'cfg, R> {
    pub fn new(config: &'cfg StoreConfig, repo: R) -> Self {
        Self {
            config,
            matcher: config.matcher(),
            repo,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn collection_address(&self) -> Address {
        self.matcher.collection()
    }

    pub fn item_address(&self, id: i64) -> Address {
        self.matcher.item(id)
    }

    pub fn register_observer(&mut self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.notifier.register(observer)
    }

    pub fn unregister_observer(&mut self, id: ObserverId) -> bool {
        self.notifier.unregister(id)
    }

    /// Classifies `address` for this provider's authority.
    pub fn resolve(&self, address: &Address) -> Result<ResolvedAddress, UsageError> {
        self.matcher.resolve(address).ok_or_else(|| {
            warn!("event=pet_resolve module=provider status=error error_code=unknown_address");
            UsageError::UnknownAddress(address.clone())
        })
    }

    pub fn type_of(&self, address: &Address) -> Result<ResourceKind, UsageError> {
        self.resolve(address).map(ResolvedAddress::kind)
    }

    /// Resource type string (`vnd.android.cursor.dir/...` or `.item/...`).
    pub fn type_name(&self, address: &Address) -> Result<String, UsageError> {
        let kind = self.type_of(address)?;
        Ok(kind.type_name(self.config.authority.as_str()))
    }

    /// Reads rows addressed by `address`.
    pub fn list(
        &self,
        address: &Address,
        projection: Option<Vec<Column>>,
        order: Option<SortOrder>,
    ) -> ProviderResult<PetRows> {
        let filter = Filter::from(self.resolve(address)?);
        let query = PetQuery {
            filter,
            projection,
            order,
        };
        let rows = self.repo.query(&query).map_err(|err| {
            error!("event=pet_query module=provider status=error error={err}");
            err
        })?;
        Ok(rows)
    }

    /// Inserts a pet into the collection and returns its item address.
    pub fn create(&self, values: &PetValues) -> ProviderResult<Address> {
        self.insert(&self.matcher.collection(), values)
    }

    /// Inserts through an explicit address; only the collection accepts it.
    pub fn insert(&self, address: &Address, values: &PetValues) -> ProviderResult<Address> {
        if let ResolvedAddress::Item(_) = self.resolve(address)? {
            return Err(UsageError::InsertNotSupported(address.clone()).into());
        }

        let pet = validate_for_insert(values).map_err(|err| {
            warn!("event=pet_insert module=provider status=rejected error={err}");
            err
        })?;

        let id = self.repo.insert(&pet).map_err(|err| {
            error!("event=pet_insert module=provider status=error error_code=insert_failed error={err}");
            err
        })?;

        let item = self.matcher.item(id);
        info!("event=pet_insert module=provider status=ok id={id}");
        self.notifier.notify(&ChangeEvent {
            address: item.clone(),
            change: ChangeKind::Inserted,
            affected: 1,
        });
        Ok(item)
    }

    /// Applies a partial update; returns rows changed.
    pub fn replace(&self, address: &Address, values: &PetValues) -> ProviderResult<usize> {
        let filter = Filter::from(self.resolve(address)?);

        match validate_for_update(values)? {
            UpdateCheck::NoOp => return Ok(0),
            UpdateCheck::Rejected => {
                warn!("event=pet_update module=provider status=rejected error_code=invalid_fields");
                return Ok(0);
            }
            UpdateCheck::Apply => {}
        }

        let changed = self.repo.update(filter, values).map_err(|err| {
            error!("event=pet_update module=provider status=error error={err}");
            err
        })?;

        info!(
            "event=pet_update module=provider status=ok fields={} affected={changed}",
            values.len()
        );
        if changed > 0 {
            self.notifier.notify(&ChangeEvent {
                address: address.clone(),
                change: ChangeKind::Updated,
                affected: changed,
            });
        }
        Ok(changed)
    }

    /// Deletes addressed rows; returns rows removed.
    pub fn remove(&self, address: &Address) -> ProviderResult<usize> {
        let filter = Filter::from(self.resolve(address)?);

        let removed = self.repo.delete(filter).map_err(|err| {
            error!("event=pet_delete module=provider status=error error={err}");
            err
        })?;

        info!("event=pet_delete module=provider status=ok affected={removed}");
        if removed > 0 {
            self.notifier.notify(&ChangeEvent {
                address: address.clone(),
                change: ChangeKind::Deleted,
                affected: removed,
            });
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_for_insert, validate_for_update, UpdateCheck};
    use crate::model::pet::{Gender, PetValues, ValidationError};
    use crate::service::error::{ProviderError, UsageError};

    #[test]
    fn update_check_short_circuits_empty_payload() {
        assert_eq!(validate_for_update(&PetValues::new()), Ok(UpdateCheck::NoOp));
    }

    #[test]
    fn update_check_rejects_non_positive_weight_softly() {
        assert_eq!(
            validate_for_update(&PetValues::new().weight(-3)),
            Ok(UpdateCheck::Rejected)
        );
    }

    #[test]
    fn update_check_treats_empty_name_as_usage_error() {
        assert_eq!(
            validate_for_update(&PetValues::new().name("").weight(4)),
            Err(UsageError::EmptyNameOnUpdate)
        );
    }

    #[test]
    fn update_check_accepts_breed_only_payload() {
        assert_eq!(
            validate_for_update(&PetValues::new().breed("")),
            Ok(UpdateCheck::Apply)
        );
    }

    #[test]
    fn insert_check_escalates_missing_gender() {
        let err = validate_for_insert(&PetValues::new().name("Rex")).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, ProviderError::Usage(UsageError::MissingGender)));
    }

    #[test]
    fn insert_check_keeps_data_errors_soft() {
        let err = validate_for_insert(&PetValues::new().gender(Gender::Male)).unwrap_err();
        assert!(!err.is_fatal());
        assert!(matches!(
            err,
            ProviderError::Validation(ValidationError::EmptyName)
        ));
    }
}
