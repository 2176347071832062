use crate::cli::{PetArgs, PetFields};
use crate::client::ApiClient;
use crate::commands::auth::{Login, login};
use crate::config::Context;
use crate::credentials::Credentials;
use crate::exit_codes;
use crate::output::{print_body, print_pets, print_status};
use crate::types::{ApiKey, ApiResponse, PetFilter};
use anyhow::Result;
use std::path::Path;

/// Log in, then hand the client and key to `op`.
async fn with_key<F, Fut>(ctx: &Context, creds: &Credentials, op: F) -> Result<u8>
where
    F: FnOnce(ApiClient, ApiKey) -> Fut,
    Fut: Future<Output = Result<u8>>,
{
    let client = ApiClient::new(ctx)?;
    match login(&client, creds).await? {
        Login::Key(key) => op(client, key).await,
        Login::Failed(code) => Ok(code),
    }
}

/// Print status and body of a mutating call.
fn report(ctx: &Context, response: &ApiResponse) -> Result<u8> {
    print_status(response);
    print_body(ctx, &response.body)?;
    Ok(exit_codes::from_status(response.status))
}

/// `petfriends list [--mine]`
pub async fn list(ctx: &Context, creds: &Credentials, mine: bool) -> Result<u8> {
    let filter = if mine { PetFilter::MyPets } else { PetFilter::All };

    with_key(ctx, creds, |client, key| async move {
        let response = client.get_list_of_pets(&key, filter).await?;
        if !response.is_success() {
            return report(ctx, &response);
        }

        let pets = response.pets()?;
        print_pets(ctx, &pets)?;
        Ok(exit_codes::SUCCESS)
    })
    .await
}

/// `petfriends add`: with `--photo` goes through the multipart endpoint.
pub async fn add(ctx: &Context, creds: &Credentials, args: PetArgs) -> Result<u8> {
    let PetArgs { fields, photo } = args;

    with_key(ctx, creds, |client, key| async move {
        let PetFields {
            name,
            animal_type,
            age,
        } = fields;

        let response = match photo {
            Some(path) => {
                client
                    .add_new_pet(&key, &name, &animal_type, &age, &path)
                    .await?
            }
            None => {
                client
                    .add_new_pet_simple(&key, &name, &animal_type, &age)
                    .await?
            }
        };
        report(ctx, &response)
    })
    .await
}

/// `petfriends set-photo <PET_ID> <PATH>`
pub async fn set_photo(ctx: &Context, creds: &Credentials, pet_id: &str, photo: &Path) -> Result<u8> {
    with_key(ctx, creds, |client, key| async move {
        let response = client.add_photo_of_pet(&key, pet_id, photo).await?;
        report(ctx, &response)
    })
    .await
}

/// `petfriends update <PET_ID> ...`
pub async fn update(ctx: &Context, creds: &Credentials, pet_id: &str, fields: PetFields) -> Result<u8> {
    with_key(ctx, creds, |client, key| async move {
        let response = client
            .update_pet_info(&key, pet_id, &fields.name, &fields.animal_type, &fields.age)
            .await?;
        report(ctx, &response)
    })
    .await
}

/// `petfriends delete <PET_ID>`
pub async fn delete(ctx: &Context, creds: &Credentials, pet_id: &str) -> Result<u8> {
    with_key(ctx, creds, |client, key| async move {
        let response = client.delete_pet(&key, pet_id).await?;
        report(ctx, &response)
    })
    .await
}
