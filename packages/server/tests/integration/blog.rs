use crate::common::{BlogFields, MAX_IMAGE_SIZE, MediaCall, PNG_BYTES, TestApp, routes, with_image};

mod create_blog {
    use super::*;

    #[tokio::test]
    async fn create_without_image_appears_in_public_listing() {
        let app = TestApp::spawn().await;

        let fields = BlogFields {
            title: "A",
            content: "B",
            blogger: "C",
            category: "D",
            summary: "E",
        };
        let res = app.post_form(routes::BLOGS, fields.form()).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Blog added successfully");

        let blogs = app.list().await;
        assert_eq!(blogs.len(), 1);
        let blog = &blogs[0];
        assert_eq!(blog["title"], "A");
        assert_eq!(blog["content"], "B");
        assert_eq!(blog["blogger"], "C");
        assert_eq!(blog["category"], "D");
        assert_eq!(blog["summary"], "E");
        assert!(blog.get("image").is_none());
        assert!(blog.get("imageId").is_none());
        assert!(blog["id"].is_string());
        assert!(blog["createdAt"].is_string());
        assert!(app.media.calls().is_empty());
    }

    #[tokio::test]
    async fn create_with_image_stores_and_serves_it() {
        let app = TestApp::spawn().await;

        let blog = app
            .create_blog("With picture", Some(("cat.png", PNG_BYTES)))
            .await;

        let image_id = blog["imageId"].as_str().expect("imageId missing");
        let image = blog["image"].as_str().expect("image missing");
        assert!(image_id.starts_with("blog-images/"));
        assert!(image_id.ends_with(".png"));
        assert!(image.ends_with(image_id));
        assert_eq!(app.media.calls(), vec![MediaCall::Upload(image_id.to_string())]);

        let (status, bytes) = app.fetch(image).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, PNG_BYTES);
    }

    #[tokio::test]
    async fn staged_upload_is_removed_after_request() {
        let app = TestApp::spawn().await;

        app.create_blog("Staged", Some(("cat.jpg", PNG_BYTES))).await;

        let sources = app.media.sources();
        assert_eq!(sources.len(), 1);
        assert!(
            !sources[0].exists(),
            "staged file {} was left behind",
            sources[0].display()
        );
    }

    #[tokio::test]
    async fn empty_image_part_counts_as_no_file() {
        let app = TestApp::spawn().await;

        let form = with_image(BlogFields::titled("No pick").form(), "", b"");
        let res = app.post_form(routes::BLOGS, form).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blog = app.find_by_title("No pick").await.unwrap();
        assert!(blog.get("image").is_none());
        assert!(app.media.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new()
            .text("title", "Incomplete")
            .text("content", "body")
            .text("category", "general")
            .text("blogger", "alice");
        let res = app.post_form(routes::BLOGS, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        let message = res.body["message"].as_str().unwrap();
        assert!(message.starts_with("Blog could not be added"), "{message}");
        assert!(message.contains("summary"), "{message}");
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn blank_and_long_titles_are_stored() {
        let app = TestApp::spawn().await;
        let long_title = "t".repeat(300);

        for title in ["", long_title.as_str()] {
            let res = app
                .post_form(routes::BLOGS, BlogFields::titled(title).form())
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        assert!(app.find_by_title("").await.is_some());
        assert!(app.find_by_title(&long_title).await.is_some());
    }

    #[tokio::test]
    async fn invalid_form_does_not_upload_image() {
        let app = TestApp::spawn().await;

        let form = reqwest::multipart::Form::new().text("title", "Only a title");
        let form = with_image(form, "cat.png", PNG_BYTES);
        let res = app.post_form(routes::BLOGS, form).await;

        assert_eq!(res.status, 400);
        assert!(app.media.calls().is_empty());
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn non_image_file_is_rejected() {
        let app = TestApp::spawn().await;

        let form = with_image(BlogFields::titled("Notes").form(), "notes.txt", b"hello");
        let res = app.post_form(routes::BLOGS, form).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.media.calls().is_empty());
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn oversized_image_is_rejected() {
        let app = TestApp::spawn().await;

        let bytes = vec![0u8; MAX_IMAGE_SIZE as usize + 1];
        let form = with_image(BlogFields::titled("Huge").form(), "huge.png", &bytes);
        let res = app.post_form(routes::BLOGS, form).await;

        assert_eq!(res.status, 400);
        assert!(res.body["message"].as_str().unwrap().contains("maximum size"));
        assert!(app.media.calls().is_empty());
    }

    #[tokio::test]
    async fn media_failure_creates_nothing() {
        let app = TestApp::spawn().await;
        app.media.fail_uploads(true);

        let form = with_image(BlogFields::titled("Doomed").form(), "cat.png", PNG_BYTES);
        let res = app.post_form(routes::BLOGS, form).await;

        assert_eq!(res.status, 500);
        assert_eq!(res.body["code"], "INTERNAL_ERROR");
        assert!(app.list().await.is_empty());

        let sources = app.media.sources();
        assert_eq!(sources.len(), 1);
        assert!(!sources[0].exists());
    }

    #[tokio::test]
    async fn listing_keeps_creation_order() {
        let app = TestApp::spawn().await;

        for title in ["first", "second", "third"] {
            app.create_blog(title, None).await;
        }

        let titles: Vec<_> = app
            .list()
            .await
            .iter()
            .map(|b| b["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }
}

mod get_blog {
    use super::*;

    #[tokio::test]
    async fn get_returns_the_blog() {
        let app = TestApp::spawn().await;
        let created = app.create_blog("Readable", None).await;
        let id = created["id"].as_str().unwrap();

        let res = app.get(&routes::blog(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, created);
    }

    #[tokio::test]
    async fn repeated_gets_are_identical() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Stable", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();

        let first = app.get(&routes::blog(id)).await;
        let second = app.get(&routes::blog(id)).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn unknown_id_returns_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&routes::blog("01936f0e-1234-7abc-8000-000000000001"))
            .await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_id_returns_400() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::blog("not-an-id")).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod update_blog {
    use super::*;

    fn changes(title: &str) -> BlogFields<'_> {
        BlogFields {
            title,
            summary: "ignored summary",
            content: "Rewritten body",
            category: "updates",
            blogger: "bob",
        }
    }

    #[tokio::test]
    async fn update_overwrites_text_and_keeps_summary_and_image() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Before", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();

        let res = app.put_form(&routes::blog(id), changes("After").form()).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Updated successfully");

        let blog = app.get(&routes::blog(id)).await.body;
        assert_eq!(blog["title"], "After");
        assert_eq!(blog["content"], "Rewritten body");
        assert_eq!(blog["category"], "updates");
        assert_eq!(blog["blogger"], "bob");
        assert_eq!(blog["summary"], "A short summary");
        assert_eq!(blog["image"], created["image"]);
        assert_eq!(blog["imageId"], created["imageId"]);
        assert_eq!(blog["createdAt"], created["createdAt"]);
        assert_eq!(app.media.calls().len(), 1);
    }

    #[tokio::test]
    async fn remove_image_clears_fields_and_deletes_asset() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Pictured", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();
        let image_id = created["imageId"].as_str().unwrap();

        let form = changes("Pictured").form().text("removeImage", "true");
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blog = app.get(&routes::blog(id)).await.body;
        assert!(blog.get("image").is_none());
        assert!(blog.get("imageId").is_none());
        assert_eq!(app.media.deletes(), vec![image_id.to_string()]);
        assert!(!app.media.asset_path(image_id).exists());
    }

    #[tokio::test]
    async fn remove_image_wins_over_new_file() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Both", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();

        let form = changes("Both").form().text("removeImage", "true");
        let form = with_image(form, "dog.png", PNG_BYTES);
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blog = app.get(&routes::blog(id)).await.body;
        assert!(blog.get("image").is_none());
        assert_eq!(app.media.uploads().len(), 1);
        assert_eq!(app.media.deletes().len(), 1);
    }

    #[tokio::test]
    async fn remove_image_ignores_unacceptable_file() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Cleanup", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();
        let image_id = created["imageId"].as_str().unwrap();

        let form = changes("Cleanup").form().text("removeImage", "true");
        let form = with_image(form, "notes.txt", b"not an image");
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blog = app.get(&routes::blog(id)).await.body;
        assert!(blog.get("image").is_none());
        assert!(blog.get("imageId").is_none());
        assert_eq!(app.media.deletes(), vec![image_id.to_string()]);
        assert_eq!(app.media.uploads().len(), 1);
    }

    #[tokio::test]
    async fn unacceptable_file_without_removal_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Guarded", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();

        let form = with_image(changes("Guarded").form(), "notes.txt", b"not an image");
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let blog = app.get(&routes::blog(id)).await.body;
        assert_eq!(blog["imageId"], created["imageId"]);
        assert!(app.media.deletes().is_empty());
    }

    #[tokio::test]
    async fn other_remove_values_leave_image() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Kept", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();

        let form = changes("Kept").form().text("removeImage", "yes");
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200);

        let blog = app.get(&routes::blog(id)).await.body;
        assert_eq!(blog["imageId"], created["imageId"]);
        assert!(app.media.deletes().is_empty());
    }

    #[tokio::test]
    async fn new_file_replaces_image() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Swap", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();
        let old_id = created["imageId"].as_str().unwrap().to_string();
        let old_url = created["image"].as_str().unwrap().to_string();

        let new_bytes: &[u8] = b"GIF89a pretend";
        let form = with_image(changes("Swap").form(), "dog.gif", new_bytes);
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200, "{}", res.text);

        let blog = app.get(&routes::blog(id)).await.body;
        let new_id = blog["imageId"].as_str().unwrap().to_string();
        assert_ne!(new_id, old_id);
        assert!(new_id.ends_with(".gif"));

        assert_eq!(
            app.media.calls(),
            vec![
                MediaCall::Upload(old_id.clone()),
                MediaCall::Delete(old_id),
                MediaCall::Upload(new_id),
            ]
        );

        let (status, _) = app.fetch(&old_url).await;
        assert_eq!(status, 404);
        let (status, bytes) = app.fetch(blog["image"].as_str().unwrap()).await;
        assert_eq!(status, 200);
        assert_eq!(bytes, new_bytes);

        assert!(app.media.sources().iter().all(|p| !p.exists()));
    }

    #[tokio::test]
    async fn new_file_on_blog_without_image_only_uploads() {
        let app = TestApp::spawn().await;
        let created = app.create_blog("Plain", None).await;
        let id = created["id"].as_str().unwrap();

        let form = with_image(changes("Plain").form(), "cat.png", PNG_BYTES);
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 200);

        let blog = app.get(&routes::blog(id)).await.body;
        assert!(blog["image"].is_string());
        assert_eq!(app.media.uploads().len(), 1);
        assert!(app.media.deletes().is_empty());
    }

    #[tokio::test]
    async fn unknown_blog_returns_404_without_media_calls() {
        let app = TestApp::spawn().await;

        let form = with_image(changes("Ghost").form(), "cat.png", PNG_BYTES);
        let res = app
            .put_form(&routes::blog("01936f0e-1234-7abc-8000-000000000001"), form)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert!(app.media.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_rejected() {
        let app = TestApp::spawn().await;
        let created = app.create_blog("Strict", None).await;
        let id = created["id"].as_str().unwrap();

        let form = reqwest::multipart::Form::new().text("title", "Strict");
        let res = app.put_form(&routes::blog(id), form).await;
        assert_eq!(res.status, 400);

        let blog = app.get(&routes::blog(id)).await.body;
        assert_eq!(blog["content"], "Body of the post");
    }
}

mod delete_blog {
    use super::*;

    #[tokio::test]
    async fn delete_removes_blog_and_image() {
        let app = TestApp::spawn().await;
        let created = app
            .create_blog("Doomed", Some(("cat.png", PNG_BYTES)))
            .await;
        let id = created["id"].as_str().unwrap();
        let image_id = created["imageId"].as_str().unwrap();

        let res = app.delete(&routes::blog(id)).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["message"], "Successfully deleted Blog");

        assert_eq!(app.get(&routes::blog(id)).await.status, 404);
        assert_eq!(app.media.deletes(), vec![image_id.to_string()]);
        assert!(!app.media.asset_path(image_id).exists());
    }

    #[tokio::test]
    async fn delete_without_image_skips_media() {
        let app = TestApp::spawn().await;
        let created = app.create_blog("Plain", None).await;
        let id = created["id"].as_str().unwrap();

        let res = app.delete(&routes::blog(id)).await;
        assert_eq!(res.status, 200);
        assert!(app.media.calls().is_empty());
        assert!(app.list().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_blog_returns_401() {
        let app = TestApp::spawn().await;

        let res = app
            .delete(&routes::blog("01936f0e-1234-7abc-8000-000000000001"))
            .await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["message"], "could not find Blog");
        assert!(app.media.calls().is_empty());
    }

    #[tokio::test]
    async fn second_delete_reports_missing() {
        let app = TestApp::spawn().await;
        let created = app.create_blog("Once", None).await;
        let id = created["id"].as_str().unwrap();

        assert_eq!(app.delete(&routes::blog(id)).await.status, 200);
        assert_eq!(app.delete(&routes::blog(id)).await.status, 401);
    }

    #[tokio::test]
    async fn malformed_id_returns_400() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::blog("42")).await;
        assert_eq!(res.status, 400);
    }
}
