use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

/// Integer keys that can be routed to a bucket.
pub trait ShardKey: Ord + Copy {
    fn shard(&self, bucket_count: usize) -> usize;
}

macro_rules! impl_shard_key {
    ($($t:ty),*) => {
        $(
            impl ShardKey for $t {
                fn shard(&self, bucket_count: usize) -> usize {
                    (*self as u64 % bucket_count as u64) as usize
                }
            }
        )*
    };
}

impl_shard_key!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Map split into independently locked buckets, so workers touching
/// different keys rarely contend.
pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

/// Exclusive access to one value. The owning bucket stays locked until this
/// guard is dropped.
pub struct Access<'a, V> {
    guard: MappedMutexGuard<'a, V>,
}

impl<V> Deref for Access<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &self.guard
    }
}

impl<V> DerefMut for Access<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut self.guard
    }
}

impl<K: ShardKey, V> ConcurrentMap<K, V> {
    /// `bucket_count` is clamped to at least one bucket.
    pub fn new(bucket_count: usize) -> Self {
        let buckets = (0..bucket_count.max(1))
            .map(|_| Mutex::new(BTreeMap::new()))
            .collect();
        Self { buckets }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        &self.buckets[key.shard(self.buckets.len())]
    }

    /// Lock the bucket owning `key` and return its value, inserting the
    /// default on first touch.
    pub fn access(&self, key: K) -> Access<'_, V>
    where
        V: Default,
    {
        let guard = MutexGuard::map(self.bucket(&key).lock(), |map| {
            map.entry(key).or_default()
        });
        Access { guard }
    }

    /// Remove `key`, locking only its bucket.
    pub fn erase(&self, key: &K) -> Option<V> {
        self.bucket(key).lock().remove(key)
    }

    /// Merge every bucket into one ordered map. Buckets are locked one at a time.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let map = bucket.lock();
            merged.extend(map.iter().map(|(k, v)| (*k, v.clone())));
        }
        merged
    }

    pub fn into_ordinary_map(self) -> BTreeMap<K, V> {
        let mut merged = BTreeMap::new();
        for bucket in self.buckets {
            merged.append(&mut bucket.into_inner());
        }
        merged
    }
}
