//! App - アプリケーション層
//!
//! rules と ports を組み合わせて探索ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **SequenceBuilder**: SequenceSpec → GaffSequence（起動時検証）
//! - **GaffSearch**: attempt ループ（cycle 生成 → 採否 → step 判定 → 確定 / やり直し）

pub mod builder;
pub mod search;

// 主要な型を再エクスポート
pub use self::builder::{BoundRule, BuildError, GaffSequence, GaffStep, SequenceBuilder};
pub use self::search::{GaffReport, GaffSearch};
