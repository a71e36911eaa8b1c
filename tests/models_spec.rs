use std::collections::HashSet;

use hbnb::models::*;
use serde_json::{json, Value};
use speculate2::speculate;

speculate! {
    describe "construction" {
        it "assigns a fresh id on every construction" {
            let ids: HashSet<String> = (0..500)
                .map(|_| Entity::new(Kind::BaseModel).id)
                .collect();
            assert_eq!(ids.len(), 500);
        }

        it "sets created_at equal to updated_at" {
            for kind in Kind::ALL {
                let entity = Entity::new(kind);
                assert_eq!(entity.created_at, entity.updated_at);
                assert_eq!(entity.kind, kind);
            }
        }

        it "starts with no extra attributes" {
            let user = Entity::new(Kind::User);
            assert!(user.attributes.is_empty());
        }

        it "builds the store key from kind and id" {
            let city = Entity::new(Kind::City);
            assert_eq!(city.key(), format!("City.{}", city.id));
        }
    }

    describe "declared fields" {
        it "reads unset declared fields as their defaults" {
            let place = Entity::new(Kind::Place);
            assert_eq!(place.get("name"), Some(json!("")));
            assert_eq!(place.get("number_rooms"), Some(json!(0)));
            assert_eq!(place.get("latitude"), Some(json!(0.0)));
            assert_eq!(place.get("amenity_ids"), Some(json!([])));
        }

        it "returns None for undeclared unset attributes" {
            let state = Entity::new(Kind::State);
            assert_eq!(state.get("population"), None);
        }

        it "prefers a set value over the default" {
            let mut user = Entity::new(Kind::User);
            user.set("email", json!("betty@example.com"));
            assert_eq!(user.get("email"), Some(json!("betty@example.com")));
        }

        it "keeps unset defaults out of rendering and records" {
            let place = Entity::new(Kind::Place);
            assert!(!place.to_string().contains("number_rooms"));
            assert!(place.to_record().attributes.is_empty());
        }

        it "declares no fields on BaseModel" {
            assert!(Kind::BaseModel.fields().is_empty());
        }

        it "declares the review fields" {
            let names: Vec<&str> = Kind::Review.fields().iter().map(|f| f.name).collect();
            assert_eq!(names, ["place_id", "user_id", "text"]);
        }
    }

    describe "kind registry" {
        it "resolves every kind by its name" {
            for kind in Kind::ALL {
                assert_eq!(Kind::from_str(kind.as_str()), Some(kind));
                assert_eq!(kind.to_string(), kind.as_str());
            }
        }

        it "rejects unknown and differently cased names" {
            assert_eq!(Kind::from_str("Spaceship"), None);
            assert_eq!(Kind::from_str("user"), None);
        }
    }

    describe "field coercion" {
        it "parses integers from text" {
            assert_eq!(FieldType::Int.coerce(&json!("23")), Some(json!(23)));
            assert_eq!(FieldType::Int.coerce(&json!(" 7 ")), Some(json!(7)));
            assert_eq!(FieldType::Int.coerce(&json!("2.5")), None);
            assert_eq!(FieldType::Int.coerce(&json!("abc")), None);
        }

        it "truncates floats to integers" {
            assert_eq!(FieldType::Int.coerce(&json!(2.9)), Some(json!(2)));
            assert_eq!(FieldType::Int.coerce(&json!(-2.9)), Some(json!(-2)));
        }

        it "parses floats from text and integers" {
            assert_eq!(FieldType::Float.coerce(&json!("37.77")), Some(json!(37.77)));
            assert_eq!(FieldType::Float.coerce(&json!(3)), Some(json!(3.0)));
            assert_eq!(FieldType::Float.coerce(&json!("north")), None);
        }

        it "renders anything as a string" {
            assert_eq!(FieldType::Str.coerce(&json!("x")), Some(json!("x")));
            assert_eq!(FieldType::Str.coerce(&json!(23)), Some(json!("23")));
        }

        it "spells constants the way literals write them" {
            assert_eq!(FieldType::Str.coerce(&json!(true)), Some(json!("True")));
            assert_eq!(FieldType::Str.coerce(&json!(false)), Some(json!("False")));
            assert_eq!(FieldType::Str.coerce(&Value::Null), Some(json!("None")));
        }

        it "never coerces lists" {
            assert!(!FieldType::List.is_scalar());
            assert_eq!(FieldType::List.coerce(&json!("[1]")), None);
        }
    }

    describe "records" {
        it "round-trips through the serialization record" {
            let mut place = Entity::new(Kind::Place);
            place.set("name", json!("Loft"));
            place.set("number_rooms", json!(3));
            place.set("amenity_ids", json!(["a", "b"]));
            place.set("extra", json!({"nested": [1, 2.5, null]}));

            let rebuilt = Entity::from_record(place.to_record()).expect("decode failed");
            assert_eq!(rebuilt, place);
        }

        it "tags the record with the kind" {
            let review = Entity::new(Kind::Review);
            let record = review.to_record();
            assert_eq!(record.class, "Review");
            assert_eq!(record.id, review.id);
            assert_eq!(record.created_at, record.updated_at);
        }

        it "recomputes timestamps from current state" {
            let mut user = Entity::new(Kind::User);
            let before = user.to_record();
            user.touch();
            let after = user.to_record();
            assert_eq!(before.created_at, after.created_at);
            assert_ne!(before.updated_at, after.updated_at);
        }
    }

    describe "touch" {
        it "moves updated_at strictly forward" {
            let mut user = Entity::new(Kind::User);
            for _ in 0..100 {
                let previous = user.updated_at;
                user.touch();
                assert!(user.updated_at > previous);
            }
            assert!(user.updated_at > user.created_at);
        }
    }

    describe "rendering" {
        it "shows kind, id and attributes" {
            let mut user = Entity::new(Kind::User);
            user.set("first_name", json!("Betty"));
            let text = user.to_string();
            assert!(text.starts_with(&format!("[User] ({}) {{", user.id)));
            assert!(text.contains(&format!("\"id\": \"{}\"", user.id)));
            assert!(text.contains("\"created_at\": "));
            assert!(text.contains("\"updated_at\": "));
            assert!(text.ends_with("\"first_name\": \"Betty\"}"));
        }

        it "renders numbers without quotes" {
            let mut place = Entity::new(Kind::Place);
            place.set("max_guest", Value::from(4));
            assert!(place.to_string().contains("\"max_guest\": 4"));
        }
    }
}
