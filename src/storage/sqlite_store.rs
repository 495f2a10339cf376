// ==========================================
// 参数持久化子系统 - SQLite 键值存储
// ==========================================
// 存储: param_kv 表 (namespace + key → BLOB)
// 并发: 单个 Mutex<Connection>，每个操作全程持锁
// 锁等待: 默认无限等待；配置 lock_timeout 后为有界等待
// ==========================================

use crate::config::StoreConfig;
use crate::db::{open_in_memory_connection, open_sqlite_connection};
use crate::storage::error::{StoreError, StoreResult};
use crate::storage::kv_store::{validate_key, KvStore};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

/// 有界等待时的轮询间隔
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(1);

// ==========================================
// SqliteStore - SQLite 键值存储
// ==========================================
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    namespace: String,
    lock_timeout: Option<Duration>,
    max_value_len: usize,
}

impl SqliteStore {
    /// 按配置打开数据库文件
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let conn = open_sqlite_connection(&config.db_path)?;
        tracing::info!(
            db_path = %config.db_path,
            namespace = %config.namespace,
            "参数存储已打开"
        );
        Ok(Self::from_connection(Arc::new(Mutex::new(conn)), config))
    }

    /// 打开私有内存数据库
    pub fn open_in_memory(namespace: &str) -> StoreResult<Self> {
        let conn = open_in_memory_connection()?;
        let config = StoreConfig {
            namespace: namespace.to_string(),
            ..StoreConfig::with_path(":memory:")
        };
        Ok(Self::from_connection(Arc::new(Mutex::new(conn)), &config))
    }

    /// 从已有连接创建（多个命名空间可共享同一连接）
    ///
    /// 说明：调用方负责确保连接已建表（见 `db::ensure_schema`）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: &StoreConfig) -> Self {
        Self {
            conn,
            namespace: config.namespace.clone(),
            lock_timeout: config.lock_timeout,
            max_value_len: config.max_value_len,
        }
    }

    /// 单个值的最大字节数
    pub fn max_value_len(&self) -> usize {
        self.max_value_len
    }

    /// 获取存储锁
    fn acquire(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        let timeout = match self.lock_timeout {
            None => {
                return self
                    .conn
                    .lock()
                    .map_err(|e| StoreError::Lock(e.to_string()));
            }
            Some(timeout) => timeout,
        };

        let timeout_ms = timeout.as_millis() as u64;
        let deadline = Instant::now() + timeout;
        loop {
            match self.conn.try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(e)) => return Err(StoreError::Lock(e.to_string())),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        tracing::error!(
                            namespace = %self.namespace,
                            timeout_ms,
                            "存储锁等待超时"
                        );
                        return Err(StoreError::LockTimeout { timeout_ms });
                    }
                    std::thread::sleep(LOCK_RETRY_INTERVAL);
                }
            }
        }
    }

    fn not_found(&self, key: &str) -> StoreError {
        StoreError::NotFound {
            namespace: self.namespace.clone(),
            key: key.to_string(),
        }
    }
}

impl KvStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        if value.len() > self.max_value_len {
            tracing::error!(key = %key, len = value.len(), max = self.max_value_len, "写入失败: 值过长");
            return Err(StoreError::ValueTooLong {
                key: key.to_string(),
                len: value.len(),
                max: self.max_value_len,
            });
        }

        let mut conn = self.acquire()?;
        let result = (|| -> rusqlite::Result<()> {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO param_kv (namespace, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(namespace, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![self.namespace, key, value],
            )?;
            tx.commit()
        })();

        match result {
            Ok(()) => {
                tracing::debug!(namespace = %self.namespace, key = %key, size = value.len(), "写入参数值");
                Ok(())
            }
            Err(e) => {
                let err = StoreError::from(e);
                tracing::error!(namespace = %self.namespace, key = %key, error = %err, "写入参数值失败");
                Err(err)
            }
        }
    }

    fn get(&self, key: &str, max_len: usize) -> StoreResult<Vec<u8>> {
        validate_key(key)?;

        let conn = self.acquire()?;
        let stored: Option<Vec<u8>> = conn
            .query_row(
                "SELECT value FROM param_kv WHERE namespace = ?1 AND key = ?2",
                params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| {
                let err = StoreError::from(e);
                tracing::error!(namespace = %self.namespace, key = %key, error = %err, "读取参数值失败");
                err
            })?;
        drop(conn);

        match stored {
            Some(mut value) => {
                tracing::debug!(namespace = %self.namespace, key = %key, size = value.len(), "读取参数值");
                value.truncate(max_len);
                Ok(value)
            }
            None => {
                tracing::debug!(namespace = %self.namespace, key = %key, "读取参数值: 键不存在");
                Err(self.not_found(key))
            }
        }
    }

    fn erase(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;

        let conn = self.acquire()?;
        let affected = conn.execute(
            "DELETE FROM param_kv WHERE namespace = ?1 AND key = ?2",
            params![self.namespace, key],
        )?;
        drop(conn);

        if affected == 0 {
            tracing::warn!(namespace = %self.namespace, key = %key, "删除参数值失败: 键不存在");
            return Err(self.not_found(key));
        }
        tracing::debug!(namespace = %self.namespace, key = %key, "删除参数值");
        Ok(())
    }

    fn erase_all(&self) -> StoreResult<()> {
        let mut conn = self.acquire()?;
        let result = (|| -> rusqlite::Result<usize> {
            let tx = conn.transaction()?;
            let affected = tx.execute(
                "DELETE FROM param_kv WHERE namespace = ?1",
                params![self.namespace],
            )?;
            tx.commit()?;
            Ok(affected)
        })();

        match result {
            Ok(affected) => {
                tracing::debug!(namespace = %self.namespace, erased = affected, "清空命名空间");
                Ok(())
            }
            Err(e) => {
                let err = StoreError::from(e);
                tracing::error!(namespace = %self.namespace, error = %err, "清空命名空间失败");
                Err(err)
            }
        }
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let conn = self.acquire()?;
        let mut stmt =
            conn.prepare("SELECT key FROM param_kv WHERE namespace = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![self.namespace], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}
