use crate::entitys::user_entity::UserEntity;
use crate::relation::model::{
    RecordPatch, Rejection, RelationField, RelationIntent, RelationOutcome, RelationState, Transition,
};

/// 从双方记录推导当前关系状态（以操作者视角）。
///
/// 每一类状态都同时看两条记录（任一侧命中即成立）：
/// 两条记录的写入没有事务，若上一次迁移只落了一半，
/// 单看一侧会漏判；按任一侧判定后，下一次成功迁移的
/// 幂等补丁会把两侧补齐
pub fn derive_state(actor_id: &str, other_id: &str, actor: &UserEntity, other: &UserEntity) -> RelationState {
    if actor.has_friend(other_id) || other.has_friend(actor_id) {
        return RelationState::Friends;
    }
    // 对方先发来的请求优先于自己发出的请求，propose 才能正确识别双向互发
    if other.has_outgoing_request(actor_id) || actor.has_incoming_request(other_id) {
        return RelationState::PendingOtherToActor;
    }
    if actor.has_outgoing_request(other_id) || other.has_incoming_request(actor_id) {
        return RelationState::PendingActorToOther;
    }
    RelationState::None
}

/// 好友关系引擎的唯一入口。
///
/// 纯函数：读入双方记录与意图，算出下一个状态和双方的字段补丁，
/// 不做任何 IO、不记日志、不重试。前置条件检查次序固定：
/// 存在性 → 自引用 → 状态判定。
///
/// 状态迁移表（操作者视角）：
///
/// | 当前状态            | propose            | accept            | decline          |
/// |---------------------|--------------------|-------------------|------------------|
/// | None                | 新建请求           | NoPendingRequest  | NoPendingRequest |
/// | PendingActorToOther | 撤回请求           | NoPendingRequest  | NoPendingRequest |
/// | PendingOtherToActor | 成为好友（互发）   | 成为好友          | 拒绝请求         |
/// | Friends             | 删除好友           | AlreadyFriends    | AlreadyFriends   |
///
/// 互发即成好友是表中的关键一行：若两人先后 propose，双方都只能
/// 作为接收者 accept，不识别反向边就会互相卡死在 pending
pub fn apply_intent(
    actor_id: &str,
    other_id: &str,
    intent: RelationIntent,
    actor: Option<&UserEntity>,
    other: Option<&UserEntity>,
) -> Result<Transition, Rejection> {
    if actor_id.is_empty() || other_id.is_empty() {
        return Err(Rejection::NotFound);
    }
    let actor = actor.ok_or(Rejection::NotFound)?;
    let other = other.ok_or(Rejection::NotFound)?;
    if actor_id == other_id {
        return Err(Rejection::SelfReference);
    }

    let state = derive_state(actor_id, other_id, actor, other);
    match (state, intent) {
        (RelationState::None, RelationIntent::Propose) => Ok(Transition {
            next_state: RelationState::PendingActorToOther,
            outcome: RelationOutcome::RequestCreated,
            actor_patch: RecordPatch::new(actor_id).add(RelationField::SentRequests, other_id),
            other_patch: RecordPatch::new(other_id).add(RelationField::FriendRequests, actor_id),
        }),
        (RelationState::PendingActorToOther, RelationIntent::Propose) => Ok(Transition {
            next_state: RelationState::None,
            outcome: RelationOutcome::RequestWithdrawn,
            actor_patch: RecordPatch::new(actor_id).remove(RelationField::SentRequests, other_id),
            other_patch: RecordPatch::new(other_id).remove(RelationField::FriendRequests, actor_id),
        }),
        (RelationState::PendingOtherToActor, RelationIntent::Propose)
        | (RelationState::PendingOtherToActor, RelationIntent::Accept) => Ok(Transition {
            next_state: RelationState::Friends,
            outcome: RelationOutcome::BecameFriends,
            actor_patch: RecordPatch::new(actor_id)
                .remove(RelationField::FriendRequests, other_id)
                .add(RelationField::Friends, other_id),
            other_patch: RecordPatch::new(other_id)
                .remove(RelationField::SentRequests, actor_id)
                .add(RelationField::Friends, actor_id),
        }),
        (RelationState::PendingOtherToActor, RelationIntent::Decline) => Ok(Transition {
            next_state: RelationState::None,
            outcome: RelationOutcome::RequestDeclined,
            actor_patch: RecordPatch::new(actor_id).remove(RelationField::FriendRequests, other_id),
            other_patch: RecordPatch::new(other_id).remove(RelationField::SentRequests, actor_id),
        }),
        (RelationState::Friends, RelationIntent::Propose) => Ok(Transition {
            next_state: RelationState::None,
            outcome: RelationOutcome::Unfriended,
            actor_patch: RecordPatch::new(actor_id).remove(RelationField::Friends, other_id),
            other_patch: RecordPatch::new(other_id).remove(RelationField::Friends, actor_id),
        }),
        (RelationState::Friends, _) => Err(Rejection::AlreadyFriends),
        // 自己发出的请求只能撤回（propose），不能替对方接受或拒绝
        (_, RelationIntent::Accept) | (_, RelationIntent::Decline) => Err(Rejection::NoPendingRequest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::model::PersistOrder;
    use rand::Rng;

    fn user(id: &str) -> UserEntity {
        UserEntity { id: id.to_string(), name: id.to_string(), ..Default::default() }
    }

    /// 在内存中执行一次迁移，成功则把双方补丁按落盘次序应用
    fn step(a: &mut UserEntity, b: &mut UserEntity, actor_is_a: bool, intent: RelationIntent) -> Result<Transition, Rejection> {
        let (actor, other) = if actor_is_a { (&*a, &*b) } else { (&*b, &*a) };
        let t = apply_intent(&actor.id, &other.id, intent, Some(actor), Some(other))?;
        for patch in t.persist_sequence() {
            if patch.uid == a.id {
                patch.apply_to(a);
            } else {
                patch.apply_to(b);
            }
        }
        Ok(t)
    }

    fn assert_mirrored(a: &UserEntity, b: &UserEntity) {
        assert_eq!(a.has_friend(&b.id), b.has_friend(&a.id), "friends 必须对称");
        assert_eq!(a.has_outgoing_request(&b.id), b.has_incoming_request(&a.id), "sent/friend_requests 必须互为镜像");
        assert_eq!(b.has_outgoing_request(&a.id), a.has_incoming_request(&b.id), "sent/friend_requests 必须互为镜像");
        // 互斥：好友与任一方向的 pending 不能同时成立
        if a.has_friend(&b.id) {
            assert!(!a.has_outgoing_request(&b.id) && !a.has_incoming_request(&b.id));
            assert!(!b.has_outgoing_request(&a.id) && !b.has_incoming_request(&a.id));
        }
    }

    #[test]
    fn propose_creates_pending_request() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        let t = step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        assert_eq!(t.outcome, RelationOutcome::RequestCreated);
        assert_eq!(t.next_state, RelationState::PendingActorToOther);
        assert_eq!(u1.sent_requests, vec!["u2"]);
        assert_eq!(u2.friend_requests, vec!["u1"]);
        assert!(u1.friends.is_empty() && u2.friends.is_empty());
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn reciprocal_propose_resolves_to_friends() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        let t = step(&mut u1, &mut u2, false, RelationIntent::Propose).unwrap();
        assert_eq!(t.outcome, RelationOutcome::BecameFriends);
        assert_eq!(u1.friends, vec!["u2"]);
        assert_eq!(u2.friends, vec!["u1"]);
        assert!(u1.sent_requests.is_empty() && u1.friend_requests.is_empty());
        assert!(u2.sent_requests.is_empty() && u2.friend_requests.is_empty());
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn double_propose_is_a_withdraw() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        let t = step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        assert_eq!(t.outcome, RelationOutcome::RequestWithdrawn);
        assert!(u1.sent_requests.is_empty());
        assert!(u2.friend_requests.is_empty());
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn accept_requires_being_receiver() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        // 发起方不能接受自己发出的请求
        let err = step(&mut u1, &mut u2, true, RelationIntent::Accept).unwrap_err();
        assert_eq!(err, Rejection::NoPendingRequest);
        // 记录保持不变
        assert_eq!(u1.sent_requests, vec!["u2"]);
        assert_eq!(u2.friend_requests, vec!["u1"]);
    }

    #[test]
    fn accept_by_receiver_creates_friendship() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        let t = step(&mut u1, &mut u2, false, RelationIntent::Accept).unwrap();
        assert_eq!(t.outcome, RelationOutcome::BecameFriends);
        assert_eq!(u1.friends, vec!["u2"]);
        assert_eq!(u2.friends, vec!["u1"]);
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn decline_clears_both_sides() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        let t = step(&mut u1, &mut u2, false, RelationIntent::Decline).unwrap();
        assert_eq!(t.outcome, RelationOutcome::RequestDeclined);
        assert!(u1.sent_requests.is_empty());
        assert!(u2.friend_requests.is_empty());
        assert!(u1.friends.is_empty() && u2.friends.is_empty());
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn decline_without_request_is_rejected_not_noop() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        let err = step(&mut u1, &mut u2, true, RelationIntent::Decline).unwrap_err();
        assert_eq!(err, Rejection::NoPendingRequest);
        let err = step(&mut u1, &mut u2, false, RelationIntent::Decline).unwrap_err();
        assert_eq!(err, Rejection::NoPendingRequest);
    }

    #[test]
    fn unfriend_is_symmetric() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        step(&mut u1, &mut u2, false, RelationIntent::Accept).unwrap();
        // 好友状态下再次 propose 即删除好友
        let t = step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        assert_eq!(t.outcome, RelationOutcome::Unfriended);
        assert!(u1.friends.is_empty());
        assert!(u2.friends.is_empty());
        assert_mirrored(&u1, &u2);
    }

    #[test]
    fn accept_or_decline_when_already_friends_is_rejected() {
        let mut u1 = user("u1");
        let mut u2 = user("u2");
        step(&mut u1, &mut u2, true, RelationIntent::Propose).unwrap();
        step(&mut u1, &mut u2, false, RelationIntent::Accept).unwrap();
        assert_eq!(step(&mut u1, &mut u2, true, RelationIntent::Accept).unwrap_err(), Rejection::AlreadyFriends);
        assert_eq!(step(&mut u1, &mut u2, false, RelationIntent::Decline).unwrap_err(), Rejection::AlreadyFriends);
        assert_eq!(u1.friends, vec!["u2"]);
        assert_eq!(u2.friends, vec!["u1"]);
    }

    #[test]
    fn self_reference_is_rejected_before_state_lookup() {
        let u1 = user("u1");
        let err = apply_intent("u1", "u1", RelationIntent::Propose, Some(&u1), Some(&u1)).unwrap_err();
        assert_eq!(err, Rejection::SelfReference);
    }

    #[test]
    fn missing_or_empty_ids_are_not_found() {
        let u1 = user("u1");
        assert_eq!(apply_intent("u1", "u9", RelationIntent::Propose, Some(&u1), None).unwrap_err(), Rejection::NotFound);
        assert_eq!(apply_intent("", "u1", RelationIntent::Propose, None, Some(&u1)).unwrap_err(), Rejection::NotFound);
        // 存在性先于自引用检查
        assert_eq!(apply_intent("u1", "u1", RelationIntent::Propose, Some(&u1), None).unwrap_err(), Rejection::NotFound);
    }

    #[test]
    fn patch_application_is_idempotent() {
        let mut u1 = user("u1");
        let u2 = user("u2");
        let t = apply_intent("u1", "u2", RelationIntent::Propose, Some(&u1), Some(&u2)).unwrap();
        t.actor_patch.apply_to(&mut u1);
        t.actor_patch.apply_to(&mut u1);
        assert_eq!(u1.sent_requests, vec!["u2"]);
    }

    #[test]
    fn persist_order_biases_toward_under_promising() {
        let u1 = user("u1");
        let u2 = user("u2");
        // 授予型：先落对方记录
        let t = apply_intent("u1", "u2", RelationIntent::Propose, Some(&u1), Some(&u2)).unwrap();
        assert_eq!(t.outcome.persist_order(), PersistOrder::OtherFirst);
        assert_eq!(t.persist_sequence()[0].uid, "u2");
        // 撤销型：先落操作者记录
        let mut a = user("u1");
        let mut b = user("u2");
        step(&mut a, &mut b, true, RelationIntent::Propose).unwrap();
        let t = apply_intent("u1", "u2", RelationIntent::Propose, Some(&a), Some(&b)).unwrap();
        assert_eq!(t.outcome, RelationOutcome::RequestWithdrawn);
        assert_eq!(t.persist_sequence()[0].uid, "u1");
    }

    #[test]
    fn half_applied_grant_is_still_observed() {
        // 模拟新建请求只落了接收方：u2 的 friend_requests 有 u1，
        // 但 u1 的 sent_requests 为空
        let u1 = user("u1");
        let mut u2 = user("u2");
        u2.friend_requests.push("u1".into());
        // u2 仍能看到并接受这条请求，接受补丁会把两侧清理干净
        let t = apply_intent("u2", "u1", RelationIntent::Accept, Some(&u2), Some(&u1)).unwrap();
        assert_eq!(t.outcome, RelationOutcome::BecameFriends);
        let mut a = u1.clone();
        let mut b = u2.clone();
        for patch in t.persist_sequence() {
            if patch.uid == a.id {
                patch.apply_to(&mut a);
            } else {
                patch.apply_to(&mut b);
            }
        }
        assert_mirrored(&a, &b);
    }

    #[test]
    fn random_intent_sequences_preserve_invariants() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let mut u1 = user("u1");
            let mut u2 = user("u2");
            for _ in 0..40 {
                let actor_is_u1 = rng.random_bool(0.5);
                let intent = match rng.random_range(0..3) {
                    0 => RelationIntent::Propose,
                    1 => RelationIntent::Accept,
                    _ => RelationIntent::Decline,
                };
                // 拒绝不能改动任何记录
                let before = (u1.clone(), u2.clone());
                if step(&mut u1, &mut u2, actor_is_u1, intent).is_err() {
                    assert_eq!(u1.friends, before.0.friends);
                    assert_eq!(u1.friend_requests, before.0.friend_requests);
                    assert_eq!(u1.sent_requests, before.0.sent_requests);
                    assert_eq!(u2.friends, before.1.friends);
                    assert_eq!(u2.friend_requests, before.1.friend_requests);
                    assert_eq!(u2.sent_requests, before.1.sent_requests);
                }
                assert_mirrored(&u1, &u2);
            }
        }
    }
}
