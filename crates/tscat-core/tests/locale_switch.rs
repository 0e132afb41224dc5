//! Locale switching under concurrent lookups.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tscat_core::{CatalogHandle, CatalogStore, Localizer, Lookup, PluralRule, parse};

fn handle(locale: &str, greeting: &str, farewell: &str) -> CatalogHandle {
    let doc = format!(
        "<TS version=\"2.1\" language=\"{locale}\"><context><name>Main</name>\
         <message><source>Hello</source><translation>{greeting}</translation></message>\
         <message><source>Bye</source><translation>{farewell}</translation></message>\
         <message numerus=\"yes\"><source>%n file(s)</source><translation>\
         <numerusform>%n {locale}-one</numerusform><numerusform>%n {locale}-other</numerusform>\
         </translation></message>\
         </context></TS>"
    );
    CatalogHandle::from_store(CatalogStore::new(parse(&doc).unwrap(), locale, PluralRule::English))
}

#[test]
fn snapshot_is_never_mixed() {
    let en = handle("en", "Hello", "Bye");
    let fr = handle("fr", "Bonjour", "Au revoir");
    let localizer = Arc::new(Localizer::new(en.clone()));
    let stop = Arc::new(AtomicBool::new(false));

    thread::scope(|scope| {
        for _ in 0..4 {
            let localizer = Arc::clone(&localizer);
            let stop = Arc::clone(&stop);
            scope.spawn(move || {
                while !stop.load(Ordering::Relaxed) {
                    let snapshot = localizer.current();
                    let hello = snapshot.translate(&Lookup::new("Main", "Hello")).unwrap();
                    let bye = snapshot.translate(&Lookup::new("Main", "Bye")).unwrap();
                    let files = snapshot
                        .translate(&Lookup::new("Main", "%n file(s)").count(2))
                        .unwrap();
                    match snapshot.locale() {
                        "en" => {
                            assert_eq!((hello.as_str(), bye.as_str()), ("Hello", "Bye"));
                            assert_eq!(files, "2 en-other");
                        }
                        "fr" => {
                            assert_eq!((hello.as_str(), bye.as_str()), ("Bonjour", "Au revoir"));
                            assert_eq!(files, "2 fr-other");
                        }
                        other => panic!("unexpected locale {other}"),
                    }

                    let direct = localizer.translate(&Lookup::new("Main", "Hello")).unwrap();
                    assert!(direct == "Hello" || direct == "Bonjour", "got {direct}");
                }
            });
        }

        for i in 0..2_000 {
            let next = if i % 2 == 0 { fr.clone() } else { en.clone() };
            localizer.switch_locale(next);
        }
        stop.store(true, Ordering::Relaxed);
    });

    assert_eq!(localizer.locale(), "en");
}

#[test]
fn old_handle_stays_usable_after_switch() {
    let en = handle("en", "Hello", "Bye");
    let fr = handle("fr", "Bonjour", "Au revoir");
    let localizer = Localizer::new(en);
    let before = localizer.current();
    localizer.switch_locale(fr);
    assert_eq!(before.translate(&Lookup::new("Main", "Hello")).unwrap(), "Hello");
    assert_eq!(localizer.translate(&Lookup::new("Main", "Hello")).unwrap(), "Bonjour");
}

#[test]
fn localizer_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Localizer>();
    assert_send_sync::<CatalogHandle>();
}
