mod common;

use std::sync::Arc;

use craftconnect_seller::{
    dto::upload::FileUpload,
    error::ClientError,
    models::{ProductStatus, ResourceId},
    screens::{
        Action, Confirm, LoadState, Outcome, discounts::DiscountScreen, product_form::ProductForm,
        products::ProductScreen, workshops::WorkshopScreen,
    },
};

use common::TestApi;

fn approve() -> Arc<dyn Confirm> {
    Arc::new(|_: &str| true)
}

fn decline() -> Arc<dyn Confirm> {
    Arc::new(|_: &str| false)
}

// Each list endpoint answers with a different envelope; all of them load.
#[tokio::test]
async fn list_endpoints_normalise_to_plain_lists() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let client = api.signed_in().await?;

    assert_eq!(client.list_products().await?.len(), 3);
    assert_eq!(client.list_featured_products().await?.len(), 1);
    assert_eq!(client.list_discounts().await?.len(), 1);
    assert_eq!(client.list_workshops().await?.len(), 1);
    assert_eq!(client.list_categories().await?.len(), 3);
    assert_eq!(client.seller_orders().await?.len(), 3);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_requests_are_auth_errors() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let client = api.client()?;

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized(_)));
    assert!(err.is_auth());
    assert!(!err.should_alert());

    let screen = DiscountScreen::new(client, approve());
    assert!(screen.load().await.unwrap_err().is_auth());
    assert!(matches!(screen.state(), LoadState::Errored(_)));
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_a_plain_api_error() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let client = api.client()?;

    let err = client
        .login("seller@craftconnect.test", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!client.session().is_authenticated());
    Ok(())
}

#[tokio::test]
async fn created_discount_is_prepended_and_form_resets() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = DiscountScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    let clamped = screen.edit_form(|form| {
        form.set_code("holiday25");
        form.usage_limit = Some(50);
        form.set_value(250)
    });
    assert_eq!(clamped, 100);

    let created = screen.create().await?;
    assert_eq!(created.code, "HOLIDAY25");
    assert_eq!(created.value, 100);

    let discounts = screen.discounts();
    assert_eq!(discounts.len(), 2);
    assert_eq!(discounts[0].code, "HOLIDAY25");
    assert!(screen.form().code.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_discount_code_surfaces_server_message() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = DiscountScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    screen.edit_form(|form| {
        form.set_code("WELCOME10");
        form.set_value(10);
    });
    let err = screen.create().await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Discount code already exists");
    assert!(err.should_alert());

    // The form is kept so the seller can correct it.
    assert_eq!(screen.form().code, "WELCOME10");
    assert_eq!(screen.discounts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn discount_disable_then_delete_with_confirmation() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let client = api.signed_in().await?;

    let declined = DiscountScreen::new(client.clone(), decline());
    declined.load().await?;
    let id = declined.discounts()[0].id.clone();
    assert_eq!(declined.delete(id.as_ref()).await?, Outcome::Unchanged);
    assert_eq!(api.state.store.read().await.discounts.len(), 1);

    let screen = DiscountScreen::new(client, approve());
    screen.load().await?;
    assert_eq!(screen.disable(id.as_ref()).await?, Outcome::Changed);
    assert!(!screen.discounts()[0].is_active);
    assert_eq!(screen.disable(id.as_ref()).await?, Outcome::Unchanged);

    assert_eq!(screen.delete(id.as_ref()).await?, Outcome::Changed);
    assert!(screen.discounts().is_empty());
    assert!(api.state.store.read().await.discounts.is_empty());
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_discount_keeps_the_list() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = DiscountScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    let err = screen
        .delete(Some(&ResourceId::new("does-not-exist")))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
    assert_eq!(screen.discounts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn toggling_featured_waits_for_the_api() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = ProductScreen::new(api.signed_in().await?, approve());
    screen.load().await?;
    assert_eq!(screen.featured().len(), 1);

    let jar = screen
        .products()
        .into_iter()
        .find(|p| p.name == "Burnay Clay Jar")
        .expect("seeded product");
    assert_eq!(
        screen.toggle_featured(jar.id.as_ref()).await?,
        Outcome::Changed
    );
    assert_eq!(screen.featured().len(), 2);

    let stored = api.state.store.read().await;
    assert!(
        stored
            .products
            .iter()
            .any(|p| p.id == jar.id && p.is_featured)
    );
    Ok(())
}

#[tokio::test]
async fn failed_toggle_leaves_the_flag_alone() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = ProductScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    let jar = screen
        .products()
        .into_iter()
        .find(|p| p.name == "Burnay Clay Jar")
        .expect("seeded product");
    let id = jar.id.clone().expect("seeded id");
    api.state
        .store
        .write()
        .await
        .products
        .retain(|p| p.id.as_ref() != Some(&id));

    let err = screen.toggle_featured(Some(&id)).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));

    let local = screen
        .products()
        .into_iter()
        .find(|p| p.id.as_ref() == Some(&id))
        .expect("still listed locally");
    assert!(!local.is_featured);
    assert_eq!(screen.featured().len(), 1);
    assert!(!screen.is_busy(&Action::Toggle(id)));
    Ok(())
}

#[tokio::test]
async fn toggling_without_an_id_makes_no_request() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    // Not signed in: any request would fail with Unauthorized.
    let screen = ProductScreen::new(api.client()?, approve());

    let err = screen.toggle_featured(None).await.unwrap_err();
    assert!(matches!(err, ClientError::MissingId));
    Ok(())
}

#[tokio::test]
async fn product_is_created_through_multipart_and_deleted() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let client = api.signed_in().await?;

    let mut form = ProductForm::default();
    form.title = "Abel Iloko Shawl".into();
    form.description = "Handwoven in Paoay".into();
    form.price = 95_000;
    form.stock_quantity = 8;
    form.category = "Textiles & Weaving".into();
    form.status = ProductStatus::Published;
    form.add_tag("woven");
    form.add_tag("woven");
    form.set_main_image(FileUpload::new("shawl.jpg", "image/jpeg", vec![7u8; 2048]))?;
    form.add_additional_image(FileUpload::new("detail.png", "image/png", vec![1u8; 512]))?;

    let screen = ProductScreen::new(client, approve());
    screen.load().await?;

    let created = screen.create(&mut form).await?;
    assert_eq!(created.name, "Abel Iloko Shawl");
    assert_eq!(created.tags, vec!["woven".to_string()]);
    assert!(created.image_url.is_some());
    assert_eq!(created.additional_images.len(), 1);
    assert!(form.title.is_empty());
    assert!(!screen.is_busy(&Action::Create));

    let products = screen.products();
    assert_eq!(products.len(), 4);
    assert_eq!(products[0].id, created.id);

    assert_eq!(screen.delete(created.id.as_ref()).await?, Outcome::Changed);
    assert_eq!(screen.products().len(), 3);
    Ok(())
}

#[tokio::test]
async fn rejected_product_keeps_the_form_and_the_list() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = ProductScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    let mut form = ProductForm::default();
    form.description = "No title yet".into();
    form.price = 10_000;

    assert!(matches!(
        screen.create(&mut form).await,
        Err(ClientError::Validation(_))
    ));
    assert_eq!(form.description, "No title yet");
    assert_eq!(screen.products().len(), 3);
    assert!(!screen.is_busy(&Action::Create));
    Ok(())
}

#[tokio::test]
async fn workshop_create_and_delete() -> anyhow::Result<()> {
    let api = TestApi::start().await?;
    let screen = WorkshopScreen::new(api.signed_in().await?, approve());
    screen.load().await?;

    screen.edit_form(|form| {
        form.title = "Burnay Pottery Session".into();
        form.location = "Pagburnayan, Vigan".into();
        form.date = chrono::NaiveDate::from_ymd_opt(2030, 3, 14);
        form.time = "14:30".into();
        form.max_participants = 12;
        form.registration_link = "https://example.com/register".into();
        form.attach_image(FileUpload::new("jar.webp", "image/webp", vec![3u8; 1024]))
    })?;

    let created = screen.create().await?;
    assert_eq!(created.time.as_deref(), Some("14:30"));
    assert!(created.image_url.is_some());
    assert_eq!(screen.workshops().len(), 2);
    assert_eq!(screen.workshops()[0].title, "Burnay Pottery Session");
    assert!(screen.form().title.is_empty());

    assert_eq!(screen.delete(created.id.as_ref()).await?, Outcome::Changed);
    assert_eq!(screen.workshops().len(), 1);
    Ok(())
}
