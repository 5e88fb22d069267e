//! RuleState - attempt ごとの型消去された状態スロット
//!
//! スロットはルール自身の `new_state()` が作るので、同じルールの
//! downcast は常に成功する。別ルールのスロットを渡した場合だけ失敗する。

use std::any::Any;
use std::fmt;

pub struct RuleState(Box<dyn Any + Send>);

impl RuleState {
    pub fn new<S: Any + Send>(state: S) -> Self {
        Self(Box::new(state))
    }

    pub fn downcast_ref<S: Any>(&self) -> Option<&S> {
        self.0.downcast_ref::<S>()
    }

    pub fn downcast_mut<S: Any>(&mut self) -> Option<&mut S> {
        self.0.downcast_mut::<S>()
    }
}

impl fmt::Debug for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RuleState(..)")
    }
}
