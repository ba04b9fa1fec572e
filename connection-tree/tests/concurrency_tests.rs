mod support;

use std::cell::RefCell;
use std::rc::Rc;

use connection_tree::{
    activate, Activation, ConnectionTree, FetchOutcome, IgnoreReason, ProfileId, TreeError,
};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use support::{node, GatedFetcher, ScriptedFetcher};

fn siblings() -> Rc<RefCell<ConnectionTree>> {
    Rc::new(RefCell::new(ConnectionTree::from_root(node(
        1,
        2,
        vec![node(2, 2, vec![]), node(3, 1, vec![])],
    ))))
}

#[test]
fn sibling_fetches_resolving_out_of_order_land_on_their_own_node() {
    let mut tree = ConnectionTree::from_root(node(
        1,
        2,
        vec![node(2, 2, vec![]), node(3, 1, vec![])],
    ));
    let two = tree.find(ProfileId(2)).unwrap();
    let three = tree.find(ProfileId(3)).unwrap();

    let Activation::FetchChildren(first) = tree.activate(two).unwrap() else {
        panic!("expected fetch for node 2");
    };
    let Activation::FetchChildren(second) = tree.activate(three).unwrap() else {
        panic!("expected fetch for node 3");
    };
    assert!(tree.is_loading(two).unwrap());
    assert!(tree.is_loading(three).unwrap());

    let outcome = tree
        .complete_fetch(second, Ok(node(3, 1, vec![node(31, 0, vec![])])))
        .unwrap();
    assert_eq!(outcome, FetchOutcome::Loaded { children: 1 });
    assert!(tree.is_loading(two).unwrap());
    assert!(!tree.is_loading(three).unwrap());

    let outcome = tree
        .complete_fetch(
            first,
            Ok(node(2, 2, vec![node(21, 0, vec![]), node(22, 0, vec![])])),
        )
        .unwrap();
    assert_eq!(outcome, FetchOutcome::Loaded { children: 2 });

    let under = |key: connection_tree::NodeKey| -> Vec<i64> {
        tree.children(key)
            .unwrap()
            .iter()
            .map(|child| tree.profile(*child).unwrap().id.get())
            .collect()
    };
    assert_eq!(under(two), vec![21, 22]);
    assert_eq!(under(three), vec![31]);
}

#[test]
fn loading_flag_stays_on_the_fetching_node() {
    let fetcher = GatedFetcher::new();
    let release = fetcher.gate(2);
    let tree = siblings();
    let two = tree.borrow().find(ProfileId(2)).unwrap();

    let mut pool = LocalPool::new();
    let weak = Rc::downgrade(&tree);
    let fetcher = Rc::new(fetcher);
    let task_fetcher = fetcher.clone();
    let handle = pool
        .spawner()
        .spawn_local_with_handle(async move { activate(weak, &*task_fetcher, two).await })
        .unwrap();
    pool.run_until_stalled();

    {
        let tree = tree.borrow();
        let rows = tree.rows();
        let loading: Vec<_> = rows
            .iter()
            .filter(|row| row.loading)
            .map(|row| row.profile.id.get())
            .collect();
        assert_eq!(loading, vec![2]);
    }

    release
        .send(Ok(node(2, 2, vec![node(21, 0, vec![])])))
        .unwrap();
    let report = pool.run_until(handle).unwrap();
    assert_eq!(report.fetch, Some(FetchOutcome::Loaded { children: 1 }));
    assert!(tree.borrow().rows().iter().all(|row| !row.loading));
}

#[test]
fn second_activation_while_loading_is_ignored() {
    let fetcher = Rc::new(GatedFetcher::new());
    let release = fetcher.gate(2);
    let tree = siblings();
    let two = tree.borrow().find(ProfileId(2)).unwrap();

    let mut pool = LocalPool::new();
    let weak = Rc::downgrade(&tree);
    let task_fetcher = fetcher.clone();
    let handle = pool
        .spawner()
        .spawn_local_with_handle(async move { activate(weak, &*task_fetcher, two).await })
        .unwrap();
    pool.run_until_stalled();

    let repeat = block_on(activate(Rc::downgrade(&tree), &*fetcher, two)).unwrap();
    assert_eq!(
        repeat.activation,
        Activation::Ignored(IgnoreReason::InFlight)
    );
    assert_eq!(repeat.fetch, None);

    release.send(Ok(node(2, 2, vec![]))).unwrap();
    let report = pool.run_until(handle).unwrap();
    assert_eq!(report.fetch, Some(FetchOutcome::Loaded { children: 0 }));
}

#[test]
fn result_is_discarded_when_tree_is_dropped_mid_fetch() {
    let fetcher = Rc::new(GatedFetcher::new());
    let release = fetcher.gate(2);
    let tree = siblings();
    let two = tree.borrow().find(ProfileId(2)).unwrap();

    let mut pool = LocalPool::new();
    let weak = Rc::downgrade(&tree);
    let task_fetcher = fetcher.clone();
    let handle = pool
        .spawner()
        .spawn_local_with_handle(async move { activate(weak, &*task_fetcher, two).await })
        .unwrap();
    pool.run_until_stalled();

    drop(tree);
    release.send(Ok(node(2, 2, vec![node(21, 0, vec![])]))).unwrap();

    let report = pool.run_until(handle).unwrap();
    assert!(matches!(report.activation, Activation::FetchChildren(_)));
    assert_eq!(report.fetch, Some(FetchOutcome::Discarded));
}

#[test]
fn activation_on_dropped_tree_is_an_error() {
    let fetcher = ScriptedFetcher::new();
    let tree = siblings();
    let two = tree.borrow().find(ProfileId(2)).unwrap();
    let weak = Rc::downgrade(&tree);
    drop(tree);

    assert_eq!(
        block_on(activate(weak, &fetcher, two)),
        Err(TreeError::Detached)
    );
    assert_eq!(fetcher.total_tree_calls(), 0);
}

#[test]
fn concurrent_sibling_activations_both_complete() {
    let fetcher = ScriptedFetcher::new()
        .with_tree(2, Ok(node(2, 2, vec![node(21, 0, vec![]), node(22, 0, vec![])])))
        .with_tree(3, Ok(node(3, 1, vec![node(31, 0, vec![])])));
    let tree = siblings();
    let two = tree.borrow().find(ProfileId(2)).unwrap();
    let three = tree.borrow().find(ProfileId(3)).unwrap();

    let (a, b) = block_on(futures::future::join(
        activate(Rc::downgrade(&tree), &fetcher, two),
        activate(Rc::downgrade(&tree), &fetcher, three),
    ));
    assert_eq!(a.unwrap().fetch, Some(FetchOutcome::Loaded { children: 2 }));
    assert_eq!(b.unwrap().fetch, Some(FetchOutcome::Loaded { children: 1 }));

    let ids: Vec<_> = tree
        .borrow()
        .rows()
        .iter()
        .map(|row| row.profile.id.get())
        .collect();
    assert_eq!(ids, vec![1, 2, 21, 22, 3, 31]);
}
