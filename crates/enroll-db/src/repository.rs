use std::marker::PhantomData;

use anyhow::{Context, Result};
use tracing::debug;

use enroll_types::models::{AccountRecord, RoleProfile};

use crate::Store;

/// Typed view over one role's record collection. The collection is a
/// JSON array under the role's store key, loaded fully into memory and
/// written back in full on every mutation. No locking across the
/// read-modify-write window: the store has exactly one logical writer.
pub struct Repository<'a, P> {
    store: &'a Store,
    _profile: PhantomData<P>,
}

impl<'a, P: RoleProfile> Repository<'a, P> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            _profile: PhantomData,
        }
    }

    fn key() -> &'static str {
        P::ROLE.collection_key()
    }

    /// Full collection read; an absent key is an empty collection.
    pub fn load(&self) -> Result<Vec<AccountRecord<P>>> {
        match self.store.get(Self::key())? {
            Some(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("malformed `{}` collection", Self::key())),
            None => Ok(Vec::new()),
        }
    }

    /// Full collection rewrite. Every mutation funnels through here.
    pub fn save(&self, records: &[AccountRecord<P>]) -> Result<()> {
        let raw = serde_json::to_string(records)?;
        self.store.put(Self::key(), &raw)?;
        debug!("persisted {} ({} records)", Self::key(), records.len());
        Ok(())
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord<P>>> {
        Ok(self.load()?.into_iter().find(|r| r.email == email))
    }

    /// Append a record and rewrite the collection. Uniqueness is the
    /// caller's business rule, not enforced here.
    pub fn insert(&self, record: AccountRecord<P>) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    /// Mutate the record matching `email` in place and rewrite the
    /// collection. Returns false, writing nothing, when no record
    /// matches.
    pub fn update<F>(&self, email: &str, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut AccountRecord<P>),
    {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.email == email) else {
            return Ok(false);
        };
        mutate(record);
        self.save(&records)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use enroll_types::models::{DonorProfile, NewAccount, TeacherProfile};

    fn teacher(email: &str) -> AccountRecord<TeacherProfile> {
        NewAccount {
            first_name: "Ani".into(),
            last_name: "Petrosyan".into(),
            email: email.into(),
            phone_number: "+37491000000".into(),
            password: "hunter2".into(),
            profile: TeacherProfile {
                region: "region1".into(),
                city: "city1".into(),
                school: "school1".into(),
                grade: "grade3".into(),
            },
        }
        .into_pending("1234".into())
    }

    fn donor(email: &str) -> AccountRecord<DonorProfile> {
        NewAccount {
            first_name: "Narek".into(),
            last_name: "Sargsyan".into(),
            email: email.into(),
            phone_number: "+37493000000".into(),
            password: "sekret".into(),
            profile: DonorProfile {
                country: "country1".into(),
                region: "region2".into(),
                city: "city2".into(),
            },
        }
        .into_pending("5678".into())
    }

    #[test]
    fn missing_collection_loads_empty() {
        let store = Store::open_in_memory().unwrap();
        let repo = Repository::<TeacherProfile>::new(&store);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn insert_appends_in_order() {
        let store = Store::open_in_memory().unwrap();
        let repo = Repository::<TeacherProfile>::new(&store);

        repo.insert(teacher("a@example.com")).unwrap();
        repo.insert(teacher("b@example.com")).unwrap();

        let records = repo.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email, "a@example.com");
        assert_eq!(records[1].email, "b@example.com");
    }

    #[test]
    fn find_by_email_matches_exactly() {
        let store = Store::open_in_memory().unwrap();
        let repo = Repository::<TeacherProfile>::new(&store);
        repo.insert(teacher("a@example.com")).unwrap();

        assert!(repo.find_by_email("a@example.com").unwrap().is_some());
        assert!(repo.find_by_email("A@example.com").unwrap().is_none());
    }

    #[test]
    fn update_mutates_and_persists() {
        let store = Store::open_in_memory().unwrap();
        let repo = Repository::<TeacherProfile>::new(&store);
        repo.insert(teacher("a@example.com")).unwrap();

        let matched = repo
            .update("a@example.com", |r| {
                r.verification_status = true;
                r.verification_code = None;
            })
            .unwrap();
        assert!(matched);

        let record = repo.find_by_email("a@example.com").unwrap().unwrap();
        assert!(record.verification_status);
        assert_eq!(record.verification_code, None);
    }

    #[test]
    fn update_without_match_writes_nothing() {
        let store = Store::open_in_memory().unwrap();
        let repo = Repository::<TeacherProfile>::new(&store);

        let matched = repo.update("ghost@example.com", |r| r.password = "x".into()).unwrap();
        assert!(!matched);
        assert_eq!(store.get("teachers").unwrap(), None);
    }

    #[test]
    fn role_collections_are_separate_keys() {
        let store = Store::open_in_memory().unwrap();
        Repository::<TeacherProfile>::new(&store)
            .insert(teacher("same@example.com"))
            .unwrap();
        Repository::<DonorProfile>::new(&store)
            .insert(donor("same@example.com"))
            .unwrap();

        assert!(store.get("teachers").unwrap().is_some());
        assert!(store.get("donors").unwrap().is_some());
        assert_eq!(
            Repository::<TeacherProfile>::new(&store).load().unwrap().len(),
            1
        );
        assert_eq!(
            Repository::<DonorProfile>::new(&store).load().unwrap().len(),
            1
        );
    }
}
